pub mod cli_args;
