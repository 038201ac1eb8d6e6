pub mod db_utils;
pub mod name_cache;
