mod common;
mod flow;
mod validators;
