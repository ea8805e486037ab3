use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar/wql.pest"]
pub struct WqlParser;
