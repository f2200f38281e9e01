use std::sync::Arc;

use log::Logger;

use crate::config::Config;
use crate::ids::IdGenerator;
use crate::store::Store;
use crate::urls::Urls;

/// Everything a handler needs, passed explicitly to every route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub store: Arc<dyn Store>,
    pub ids: Arc<IdGenerator>,
    pub urls: Arc<Urls>,
    pub config: Config,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        store: Arc<dyn Store>,
        ids: Arc<IdGenerator>,
        urls: Arc<Urls>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            store,
            ids,
            urls,
            config,
        }
    }
}
