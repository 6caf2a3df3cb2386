//! One-shot stdio transport
//!
//! Reads the whole input stream, dispatches it once, and writes at most one
//! compact JSON line.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::errors::AppError;
use crate::rpc::dispatcher::{Dispatcher, Outcome};

pub async fn serve_once<R, W>(dispatcher: &Dispatcher, mut input: R, mut output: W) -> Result<(), AppError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut body = Vec::new();
    input.read_to_end(&mut body).await?;

    match dispatcher.dispatch_slice(&body) {
        Outcome::Respond(response) => {
            let mut line = response.to_vec()?;
            line.push(b'\n');
            output.write_all(&line).await?;
            output.flush().await?;
        }
        Outcome::NoResponse => debug!("notification received, nothing written"),
    }

    Ok(())
}
