use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "mayasm.pest"]
pub struct MayasmParser;
