mod export;
mod helpers;
mod operations;
