pub mod json_utils;
pub mod money_utils;
pub mod time_utils;
