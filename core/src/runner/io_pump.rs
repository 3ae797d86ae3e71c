use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;

use super::capture::CaptureBuffer;

/// Copy a child stream into `buf` until EOF. Returns the number of bytes read.
pub fn pump<R>(mut rd: R, buf: CaptureBuffer, label: &'static str) -> JoinHandle<std::io::Result<u64>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = vec![0u8; 16 * 1024];
        let mut total = 0u64;

        loop {
            let n = match rd.read(&mut chunk).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!(stream = label, error = %e, "pump read failed");
                    return Err(e);
                }
            };
            if n == 0 {
                break;
            }
            buf.push(&chunk[..n]);
            total += n as u64;
        }

        Ok(total)
    })
}
