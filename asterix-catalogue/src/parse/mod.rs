pub mod parser;
pub mod xml_model;
