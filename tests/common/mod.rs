#![allow(dead_code)]

use async_trait::async_trait;
use quire::catalog::{Catalog, EssayDescriptor};
use quire::content::{ContentFetcher, ContentLoader, FetchError, MarkdownRenderer};
use quire::navigation::{Location, MemoryHistory, NavigationController};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const STARTUP: &str = "1.how_to_start_a_startup.md";
pub const SCALE: &str = "2.do_things_that_dont_scale.md";

pub fn location_of(identifier: &str) -> String {
    format!("essays/{}", identifier)
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::new(vec![
            EssayDescriptor::new("How To Start A Startup", STARTUP, location_of(STARTUP)),
            EssayDescriptor::new("Do Things That Don't Scale", SCALE, location_of(SCALE)),
        ])
        .unwrap(),
    )
}

pub fn loader(fetcher: Arc<dyn ContentFetcher>) -> ContentLoader {
    ContentLoader::new(fetcher, Arc::new(MarkdownRenderer::new()))
}

pub fn controller_at(
    initial: Location,
    fetcher: Arc<dyn ContentFetcher>,
) -> (NavigationController, MemoryHistory) {
    controller_with_loader(initial, loader(fetcher))
}

pub fn controller_with_loader(
    initial: Location,
    loader: ContentLoader,
) -> (NavigationController, MemoryHistory) {
    let history = MemoryHistory::new(initial);
    let controller = NavigationController::new(catalog(), loader, Arc::new(history.clone()));
    (controller, history)
}

type Gate = oneshot::Receiver<Result<Vec<u8>, FetchError>>;

/// Fetcher whose responses are released by the test, so completion order
/// can be chosen independently of request order.
#[derive(Default)]
pub struct GatedFetcher {
    gates: Mutex<HashMap<String, VecDeque<Gate>>>,
}

impl GatedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next response for `location`; send on the returned
    /// sender to let the fetch finish.
    pub fn gate(&self, location: &str) -> oneshot::Sender<Result<Vec<u8>, FetchError>> {
        let (sender, receiver) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry(location.to_string())
            .or_default()
            .push_back(receiver);
        sender
    }
}

#[async_trait]
impl ContentFetcher for GatedFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .get_mut(location)
            .and_then(VecDeque::pop_front);

        match gate {
            Some(gate) => gate.await.unwrap_or_else(|_| {
                Err(FetchError::Transport {
                    location: location.to_string(),
                    message: "gate dropped".to_string(),
                })
            }),
            None => Err(FetchError::NotFound {
                location: location.to_string(),
            }),
        }
    }
}
