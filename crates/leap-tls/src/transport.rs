//! Byte transports the connection runs over.
//!
//! The engine never opens sockets. It reads and writes through these traits,
//! and those calls are the only points where a connection can block or
//! suspend.

use std::io::{self, Read, Write};

/// Blocking transport.
pub trait Transport {
    /// Read whatever is available, at least one byte unless at EOF.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Fill `buf` completely. EOF first is `UnexpectedEof`.
    fn read_fully(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Write all of `buf`.
    fn write(&mut self, buf: &[u8]) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()>;
}

impl<T: Read + Write> Transport for T {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match Read::read(self, buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_all(buf)?;
        self.flush()
    }

    /// Flush only; the stream itself is closed when dropped.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(feature = "async")]
pub use self::nonblocking::AsyncTransport;

#[cfg(feature = "async")]
mod nonblocking {
    use std::io;

    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

    /// Suspending transport, the async counterpart of [`super::Transport`].
    #[allow(async_fn_in_trait)]
    pub trait AsyncTransport {
        async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

        async fn read_fully(&mut self, buf: &mut [u8]) -> io::Result<()> {
            let mut filled = 0;
            while filled < buf.len() {
                match self.read(&mut buf[filled..]).await? {
                    0 => return Err(io::ErrorKind::UnexpectedEof.into()),
                    n => filled += n,
                }
            }
            Ok(())
        }

        async fn write(&mut self, buf: &[u8]) -> io::Result<()>;

        async fn close(&mut self) -> io::Result<()>;
    }

    impl<T: AsyncRead + AsyncWrite + Unpin> AsyncTransport for T {
        async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            AsyncReadExt::read(self, buf).await
        }

        async fn write(&mut self, buf: &[u8]) -> io::Result<()> {
            self.write_all(buf).await?;
            self.flush().await
        }

        /// Shuts down the write half so the peer sees EOF.
        async fn close(&mut self) -> io::Result<()> {
            self.shutdown().await
        }
    }
}
