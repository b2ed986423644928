//! Arrow data handling utilities

pub mod array_utils;

pub use array_utils::{
    as_string_array, date32_column, downcast_array, get_column_by_name, get_column_index,
    int32_column, non_null_values, string_column,
};
