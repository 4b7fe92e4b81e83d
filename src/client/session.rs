use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::http::{HttpTransport, ReqwestConfig};

/// How a session obtains a fresh transport on (re)open.
pub(crate) enum Opener {
    Reqwest(ReqwestConfig),
    /// A caller-supplied transport, reused as-is on every reopen.
    Fixed(Arc<dyn HttpTransport>),
}

impl Opener {
    fn open(&self) -> Result<Arc<dyn HttpTransport>, reqwest::Error> {
        match self {
            Self::Reqwest(config) => Ok(Arc::new(config.open()?)),
            Self::Fixed(transport) => Ok(Arc::clone(transport)),
        }
    }
}

/// Closable handle to the HTTP transport shared by every clone of a client.
///
/// Calls take their own `Arc` to the transport before dispatching, so closing the
/// session never interrupts a request that is already in flight.
pub(crate) struct Session {
    transport: RwLock<Option<Arc<dyn HttpTransport>>>,
    opener: Opener,
}

impl Session {
    pub fn open(opener: Opener) -> Result<Self, reqwest::Error> {
        let transport = opener.open()?;
        Ok(Self {
            transport: RwLock::new(Some(transport)),
            opener,
        })
    }

    /// Current transport, or `None` once the session has been closed.
    pub fn transport(&self) -> Option<Arc<dyn HttpTransport>> {
        self.transport.read().clone()
    }

    /// Drop the transport. Returns `false` if the session was already closed.
    pub fn close(&self) -> bool {
        self.transport.write().take().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.transport.read().is_none()
    }

    pub fn reopen(&self) -> Result<(), reqwest::Error> {
        let transport = self.opener.open()?;
        *self.transport.write() = Some(transport);
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::{BoxFuture, HttpRequest, HttpResponse, TransportError};

    struct Echo;

    impl HttpTransport for Echo {
        fn send<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 200,
                    body: "{}".to_owned(),
                })
            })
        }
    }

    #[test]
    fn close_and_reopen_cycle() {
        let session = Session::open(Opener::Fixed(Arc::new(Echo))).unwrap();
        assert!(!session.is_closed());
        assert!(session.transport().is_some());

        assert!(session.close());
        assert!(!session.close());
        assert!(session.is_closed());
        assert!(session.transport().is_none());

        session.reopen().unwrap();
        assert!(!session.is_closed());
    }

    #[test]
    fn held_transport_outlives_close() {
        let session = Session::open(Opener::Fixed(Arc::new(Echo))).unwrap();
        let held = session.transport().unwrap();
        session.close();
        assert_eq!(Arc::strong_count(&held), 2);
    }
}
