//! Registry code tables.
//!
//! Closed mappings from the registry's published codes to their labels.
//! Codes outside the published set map to `None`.

use serde::Serialize;

/// Registration status of an establishment (`situacao_cadastral`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistryStatus {
    /// Code `01`
    Nula,
    /// Code `02`
    Ativa,
    /// Code `03`
    Suspensa,
    /// Code `04`
    Inapta,
    /// Code `08`
    Baixada,
}

impl RegistryStatus {
    /// Every published status, in code order
    pub const ALL: [Self; 5] = [
        Self::Nula,
        Self::Ativa,
        Self::Suspensa,
        Self::Inapta,
        Self::Baixada,
    ];

    /// Look up a raw status code
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Nula),
            "02" => Some(Self::Ativa),
            "03" => Some(Self::Suspensa),
            "04" => Some(Self::Inapta),
            "08" => Some(Self::Baixada),
            _ => None,
        }
    }

    /// Raw registry code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Nula => "01",
            Self::Ativa => "02",
            Self::Suspensa => "03",
            Self::Inapta => "04",
            Self::Baixada => "08",
        }
    }

    /// Display label stored in `situacao_descricao`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nula => "NULA",
            Self::Ativa => "ATIVA",
            Self::Suspensa => "SUSPENSA",
            Self::Inapta => "INAPTA",
            Self::Baixada => "BAIXADA",
        }
    }
}

/// Headquarters/branch indicator (`identificador_matriz_filial`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EstablishmentType {
    /// Code `1`
    Matriz,
    /// Code `2`
    Filial,
}

impl EstablishmentType {
    /// Both published types, in code order
    pub const ALL: [Self; 2] = [Self::Matriz, Self::Filial];

    /// Look up a raw type code
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Matriz),
            "2" => Some(Self::Filial),
            _ => None,
        }
    }

    /// Raw registry code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Matriz => "1",
            Self::Filial => "2",
        }
    }

    /// Display label stored in `tipo_estabelecimento`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Matriz => "MATRIZ",
            Self::Filial => "FILIAL",
        }
    }
}

/// Map a raw status code to its label
#[must_use]
pub fn map_status_code(code: Option<&str>) -> Option<&'static str> {
    code.and_then(RegistryStatus::from_code)
        .map(RegistryStatus::label)
}

/// Map a raw establishment type code to its label
#[must_use]
pub fn map_type_code(code: Option<&str>) -> Option<&'static str> {
    code.and_then(EstablishmentType::from_code)
        .map(EstablishmentType::label)
}
