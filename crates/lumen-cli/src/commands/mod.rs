pub mod config;
pub mod pages;
pub mod run;
pub mod type_text;
