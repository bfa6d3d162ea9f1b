//! Ranking hosted on a worker thread, driven through `worker_rpc`.

use std::sync::Arc;

use factor_core::{
    factors_card, fingerprint, load_ranking_config_from_env, rank, rank_var, ContentCatalog,
    Factor, FactorsCard, GameState, RankingConfig, Rankings, Var,
};
use serde_json::{json, Value};
use worker_rpc::{arg, to_value, RemoteClass, RemoteError, RemoteInstance, RpcError};

pub struct FactorWorker {
    state: GameState,
    catalog: ContentCatalog,
    config: Arc<RankingConfig>,
}

impl RemoteClass for FactorWorker {
    const NAME: &'static str = "FactorWorker";
    const METHODS: &'static [&'static str] = &["rank", "rank_var", "factors_card", "fingerprint"];

    /// Args: `[state?, catalog?]`; omitted ones fall back to the builtin data.
    fn construct(args: Vec<Value>) -> Result<Self, RemoteError> {
        let state = match args.first() {
            Some(Value::Null) | None => (*GameState::builtin_sample()).clone(),
            Some(_) => arg(&args, 0, "new")?,
        };
        let catalog = match args.get(1) {
            Some(Value::Null) | None => (*ContentCatalog::builtin()).clone(),
            Some(_) => arg(&args, 1, "new")?,
        };
        let (config, _) = load_ranking_config_from_env();
        Ok(Self {
            state,
            catalog,
            config,
        })
    }

    fn get(&self, key: &str) -> Result<Value, RemoteError> {
        match key {
            "state" => to_value(&self.state, key),
            "year" => Ok(json!(self.state.world.year)),
            _ => Err(RemoteError::UnknownKey { key: key.into() }),
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), RemoteError> {
        match key {
            "state" => {
                self.state = arg(&[value], 0, key)?;
                Ok(())
            }
            _ => Err(RemoteError::UnknownKey { key: key.into() }),
        }
    }

    fn call(&mut self, method: &str, args: Vec<Value>) -> Result<Value, RemoteError> {
        match method {
            "rank" => to_value(&self.rankings(), method),
            "rank_var" => {
                let var: Var = arg(&args, 0, method)?;
                to_value(
                    &rank_var(var, &self.state, &self.catalog, &self.config),
                    method,
                )
            }
            "factors_card" => {
                let var: Var = arg(&args, 0, method)?;
                let current: Option<String> = match args.get(1) {
                    Some(_) => arg(&args, 1, method)?,
                    None => None,
                };
                to_value(&factors_card(var, &self.state, current), method)
            }
            "fingerprint" => {
                let hash =
                    fingerprint(&self.rankings()).map_err(|err| RemoteError::Invocation {
                        key: method.into(),
                        message: err.to_string(),
                    })?;
                Ok(json!(hash))
            }
            _ => Err(RemoteError::UnknownMethod { key: method.into() }),
        }
    }
}

impl FactorWorker {
    fn rankings(&self) -> Rankings {
        rank(&self.state, &self.catalog, &self.config)
    }
}

/// Typed controller-side stub for [`FactorWorker`].
#[derive(Debug, Clone)]
pub struct FactorWorkerClient {
    remote: RemoteInstance,
}

impl From<RemoteInstance> for FactorWorkerClient {
    fn from(remote: RemoteInstance) -> Self {
        Self { remote }
    }
}

impl FactorWorkerClient {
    pub async fn rank(&self) -> Result<Rankings, RpcError> {
        self.remote.call_as("rank", vec![]).await
    }

    pub async fn rank_var(&self, var: Var) -> Result<Vec<Factor>, RpcError> {
        self.remote.call_as("rank_var", vec![json!(var)]).await
    }

    pub async fn factors_card(
        &self,
        var: Var,
        current: Option<&str>,
    ) -> Result<FactorsCard, RpcError> {
        self.remote
            .call_as("factors_card", vec![json!(var), json!(current)])
            .await
    }

    pub async fn fingerprint(&self) -> Result<u64, RpcError> {
        self.remote.call_as("fingerprint", vec![]).await
    }
}
