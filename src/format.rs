//! Display helpers.

/// Render the 8-digit CNPJ root as `NN.NNN.NNN`
///
/// Shorter values are zero-padded on the left; characters past the eighth
/// are dropped. A missing value renders as `""`.
#[must_use]
pub fn format_cnpj_basico(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim) else {
        return String::new();
    };
    let chars: Vec<char> = value.chars().collect();
    let padded: Vec<char> = std::iter::repeat_n('0', 8usize.saturating_sub(chars.len()))
        .chain(chars)
        .take(8)
        .collect();

    let part = |range: std::ops::Range<usize>| padded[range].iter().collect::<String>();
    format!("{}.{}.{}", part(0..2), part(2..5), part(5..8))
}
