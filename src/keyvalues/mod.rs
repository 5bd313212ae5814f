mod lexer;
mod parser;
mod repr;

pub use lexer::{next_token, Token, Tokens};

pub(crate) use lexer::is_separator;

pub use parser::{parse_objects, parse_single_object, read_objects};

pub use repr::SerialisedObject;



#[cfg(test)]
mod repr_test;
