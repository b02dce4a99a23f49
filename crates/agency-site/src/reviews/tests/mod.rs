mod common;
mod effects;
