use addrcheck_config::ConfigError;
use addrcheck_core::CoreError;
use addrcheck_remote::RemoteError;
use addrcheck_table::TableError;
use anyhow::Error;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_AUTH_FAILED: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_AUTH_FAILED);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(table_err) = cause.downcast_ref::<TableError>() {
            return ExitCode::from(table_exit_code(table_err));
        }
        if let Some(remote_err) = cause.downcast_ref::<RemoteError>() {
            return ExitCode::from(remote_exit_code(remote_err));
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::MissingSecret { .. }
        | ConfigError::InvalidUrl { .. }
        | ConfigError::InvalidUserAgent
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn table_exit_code(err: &TableError) -> u8 {
    match err {
        TableError::Csv(_) | TableError::XlsxRead(_) | TableError::MissingHeader => {
            EXIT_INVALID_INPUT
        }
        TableError::Io(_)
        | TableError::XlsxWrite(_)
        | TableError::Json(_)
        | TableError::TooLarge
        | TableError::RowMismatch { .. } => EXIT_FAILURE,
    }
}

fn remote_exit_code(err: &RemoteError) -> u8 {
    match err {
        RemoteError::Core(_) => EXIT_AUTH_FAILED,
        RemoteError::Url(_) | RemoteError::Parse(_) => EXIT_INVALID_INPUT,
        RemoteError::Http(_) | RemoteError::Status { .. } => EXIT_FAILURE,
    }
}
