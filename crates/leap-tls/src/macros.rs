//! Internal macros for sync/async code unification.
//!
//! Blocking and async connections run the same method bodies; the only
//! differences are `fn` vs `async fn`, `.await` after transport calls, and
//! `Transport` vs `AsyncTransport` bounds. Each body takes a `$mode` of
//! `sync` or `is_async` and uses `maybe_await!` around transport I/O.
//! Every body expects `$self.stream` and `$self.core` (a `ConnectionCore`).

/// Conditionally `.await` an expression based on sync/async mode.
///
/// - `maybe_await!(sync, expr)` expands to `expr`
/// - `maybe_await!(is_async, expr)` expands to `expr.await`
macro_rules! maybe_await {
    (sync, $e:expr) => {
        $e
    };
    (is_async, $e:expr) => {
        $e.await
    };
}

/// Body for `fill_buf`: read until `read_buf` holds at least `$min_bytes`.
macro_rules! fill_buf_body {
    ($mode:ident, $self:ident, $min_bytes:expr) => {{
        let min = $min_bytes;
        while $self.core.read_buf.len() < min {
            let mut tmp = [0u8; 16384];
            let n = maybe_await!($mode, $self.stream.read(&mut tmp))?;
            if n == 0 {
                return Err(TlsError::ConnectionClosed);
            }
            $self.core.read_buf.extend_from_slice(&tmp[..n]);
        }
        Ok(())
    }};
}

/// Body for `read_record`: read and open one record.
macro_rules! read_record_body {
    ($mode:ident, $self:ident) => {{
        maybe_await!($mode, $self.fill_buf(RECORD_HEADER_LEN))?;
        let total = $self.core.next_record_len()?;
        maybe_await!($mode, $self.fill_buf(total))?;
        $self.core.open_buffered()
    }};
}

/// Body for `flush`: write out queued records.
macro_rules! flush_body {
    ($mode:ident, $self:ident) => {{
        let out = $self.core.take_outbound();
        if !out.is_empty() {
            maybe_await!($mode, $self.stream.write(&out))?;
        }
        Ok(())
    }};
}

/// Body for `drive_handshake`: run records through the state machine until
/// both Finished messages are verified.
macro_rules! drive_handshake_body {
    ($mode:ident, $self:ident) => {{
        $self.core.start()?;
        maybe_await!($mode, $self.flush())?;
        while $self.core.state == ConnectionState::Handshaking {
            let (ct, plaintext) = maybe_await!($mode, $self.read_record())?;
            $self.core.absorb(ct, &plaintext)?;
            maybe_await!($mode, $self.flush())?;
        }
        Ok(())
    }};
}

/// Body for `abort`: best-effort fatal alert, then close the transport.
/// Errors from the teardown itself are dropped.
macro_rules! abort_body {
    ($mode:ident, $self:ident, $err:expr) => {{
        let err: &TlsError = $err;
        if let Some(alert) = $self.core.fail(err) {
            let _ = maybe_await!($mode, $self.stream.write(&alert));
        }
        let _ = maybe_await!($mode, $self.stream.close());
    }};
}

/// Body for the `handshake` trait method.
macro_rules! handshake_trait_body {
    ($mode:ident, $self:ident) => {{
        match $self.core.state {
            ConnectionState::Connected => return Ok(()),
            ConnectionState::Closed | ConnectionState::Error => {
                return Err(TlsError::ConnectionClosed)
            }
            ConnectionState::Handshaking => {}
        }
        match maybe_await!($mode, $self.drive_handshake()) {
            Ok(()) => Ok(()),
            Err(e) => {
                maybe_await!($mode, $self.abort(&e));
                Err(e)
            }
        }
    }};
}

/// Body for the `read` trait method.
macro_rules! read_trait_body {
    ($mode:ident, $self:ident, $buf:ident) => {{
        if $self.core.state == ConnectionState::Handshaking {
            maybe_await!($mode, $self.handshake())?;
        }
        loop {
            let n = $self.core.take_app_data($buf);
            if n > 0 || $buf.is_empty() {
                return Ok(n);
            }
            if $self.core.peer_closed() {
                return Ok(0);
            }
            if $self.core.state != ConnectionState::Connected {
                return Err(TlsError::ConnectionClosed);
            }
            let step = match maybe_await!($mode, $self.read_record()) {
                Ok((ct, plaintext)) => $self.core.absorb(ct, &plaintext),
                Err(e) => Err(e),
            };
            let step = match step {
                Ok(()) => maybe_await!($mode, $self.flush()),
                Err(e) => Err(e),
            };
            if let Err(e) = step {
                maybe_await!($mode, $self.abort(&e));
                return Err(e);
            }
        }
    }};
}

/// Body for the `write` trait method.
macro_rules! write_trait_body {
    ($mode:ident, $self:ident, $buf:ident) => {{
        if $self.core.state == ConnectionState::Handshaking {
            maybe_await!($mode, $self.handshake())?;
        }
        if $self.core.state != ConnectionState::Connected {
            return Err(TlsError::ConnectionClosed);
        }
        if $buf.is_empty() {
            return Ok(0);
        }
        let sealed = $self.core.seal_application_data($buf);
        let step = match sealed {
            Ok(()) => maybe_await!($mode, $self.flush()),
            Err(e) => Err(e),
        };
        match step {
            Ok(()) => Ok($buf.len()),
            Err(e) => {
                maybe_await!($mode, $self.abort(&e));
                Err(e)
            }
        }
    }};
}

/// Body for the `close` trait method.
macro_rules! close_trait_body {
    ($mode:ident, $self:ident) => {{
        if $self.core.state == ConnectionState::Closed {
            return Ok(());
        }
        let sent = if $self.core.queue_close_notify() {
            maybe_await!($mode, $self.flush())
        } else {
            Ok(())
        };
        $self.core.state = ConnectionState::Closed;
        let closed = maybe_await!($mode, $self.stream.close()).map_err(TlsError::from);
        sent.and(closed)
    }};
}
