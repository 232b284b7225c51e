use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Client error: status code: {status_code}, message: {message}")]
    ClientRequest { status_code: u16, message: String },
    #[error("Server error: status code: {status_code}, message: {message}")]
    ServerRequest { status_code: u16, message: String },
    #[error("Generic request error: {0:?}")]
    GenericRequest(String),
    #[error("Json parse error: {0:?}")]
    JsonParse(String),
    #[error("Secret key is not valid base64: {0}")]
    SecretDecode(String),
    #[error("Signature failure: {0}")]
    SignatureFailure(String),
}

pub type Result<T> = std::result::Result<T, Error>;
