use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mailgun rejected the message: status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid mailer configuration: {0}")]
    Config(String),
}
