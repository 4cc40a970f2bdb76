//! Route sources - a fixed route and a watch-backed route that can change.

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use postdesk_core::ports::{POST_ID_PARAM, ParamMap, Route};

/// Route that emits a single parameter snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticRoute {
    params: ParamMap,
}

impl StaticRoute {
    pub fn new(params: ParamMap) -> Self {
        Self { params }
    }

    /// Edit route when `post_id` is set, create route otherwise.
    pub fn for_post(post_id: Option<&str>) -> Self {
        match post_id {
            Some(id) => Self::new(ParamMap::new().with(POST_ID_PARAM, id)),
            None => Self::default(),
        }
    }
}

impl Route for StaticRoute {
    fn param_map(&self) -> BoxStream<'static, ParamMap> {
        stream::once(futures::future::ready(self.params.clone())).boxed()
    }
}

/// Route whose parameters can be changed while the editor is open.
///
/// Subscribers see the current parameters first, then every change.
pub struct WatchRoute {
    sender: watch::Sender<ParamMap>,
}

impl WatchRoute {
    pub fn new(initial: ParamMap) -> Self {
        Self {
            sender: watch::Sender::new(initial),
        }
    }

    pub fn navigate(&self, params: ParamMap) {
        tracing::debug!(?params, "Route changed");
        self.sender.send_replace(params);
    }

    pub fn current(&self) -> ParamMap {
        self.sender.borrow().clone()
    }
}

impl Route for WatchRoute {
    fn param_map(&self) -> BoxStream<'static, ParamMap> {
        WatchStream::new(self.sender.subscribe()).boxed()
    }
}
