use crate::core::context::FetchContext;
use crate::core::request::buyback_contracts_request;
use crate::core::retry::RetryPolicy;
use crate::core::transform::contracts_from_reply;
use crate::domain::model::{BuybackContractsRep, Contract};
use crate::domain::ports::{ConfigProvider, ItemConfigurator};
use crate::utils::error::{ContractError, Result};

/// Fetches buyback contracts from a connected item configurator stub.
pub struct ContractFetcher<S: ItemConfigurator> {
    stub: S,
    refresh_token: String,
    retry: RetryPolicy,
}

impl<S: ItemConfigurator> ContractFetcher<S> {
    pub fn new(stub: S, refresh_token: impl Into<String>) -> Self {
        Self {
            stub,
            refresh_token: refresh_token.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config<C: ConfigProvider>(stub: S, config: &C) -> Self {
        Self::new(stub, config.refresh_token()).with_retry_policy(config.retry_policy())
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Runs one logical "get contracts" call.
    ///
    /// Only the RPC is retried. A reply containing a record without ESI
    /// details fails the call with [`ContractError::MalformedRecord`] and is
    /// never retried.
    pub async fn fetch_contracts(&self, ctx: &FetchContext) -> Result<Vec<Contract>> {
        let reply = self.request_with_retry(ctx).await?;
        let contracts = contracts_from_reply(reply)?;

        tracing::info!("Fetched {} buyback contract(s)", contracts.len());
        Ok(contracts)
    }

    async fn request_with_retry(&self, ctx: &FetchContext) -> Result<BuybackContractsRep> {
        let request = buyback_contracts_request(&self.refresh_token);
        let mut attempt = 0;
        tracing::debug!(
            "Fetching buyback contracts: up to {} attempt(s), at most {:?} of backoff",
            self.retry.max_attempts,
            self.retry.worst_case_backoff()
        );

        loop {
            attempt += 1;
            if let Some(delay) = self.retry.delay_before(attempt) {
                tracing::debug!("Waiting {:?} before attempt {}", delay, attempt);
                ctx.sleep(delay).await?;
            }

            tracing::debug!(
                "BuybackContracts attempt {}/{}",
                attempt,
                self.retry.max_attempts
            );

            match ctx.run(self.stub.buyback_contracts(&request)).await? {
                Ok(reply) => return Ok(reply),
                Err(e) if self.retry.has_attempts_left(attempt) => {
                    tracing::warn!("BuybackContracts attempt {} failed: {}", attempt, e);
                }
                Err(e) => {
                    tracing::error!(
                        "BuybackContracts failed after {} attempt(s): {}",
                        attempt,
                        e
                    );
                    return Err(ContractError::TransportFailure {
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BuybackContract, BuybackContractsReq, EsiContract};
    use crate::utils::error::RpcError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    type Outcome = std::result::Result<BuybackContractsRep, RpcError>;

    /// Replays scripted outcomes and records every request it receives.
    #[derive(Clone)]
    struct MockConfigurator {
        outcomes: Arc<Mutex<VecDeque<Outcome>>>,
        requests: Arc<Mutex<Vec<BuybackContractsReq>>>,
    }

    impl MockConfigurator {
        fn new(outcomes: Vec<Outcome>) -> Self {
            Self {
                outcomes: Arc::new(Mutex::new(outcomes.into())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        async fn calls(&self) -> usize {
            self.requests.lock().await.len()
        }

        async fn requests(&self) -> Vec<BuybackContractsReq> {
            self.requests.lock().await.clone()
        }
    }

    #[async_trait]
    impl ItemConfigurator for MockConfigurator {
        async fn buyback_contracts(
            &self,
            request: &BuybackContractsReq,
        ) -> std::result::Result<BuybackContractsRep, RpcError> {
            self.requests.lock().await.push(request.clone());
            self.outcomes
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Err(RpcError::Unavailable("no scripted outcome".to_string())))
        }
    }

    /// Never answers; used to check that cancellation reaches in-flight calls.
    struct HangingConfigurator;

    #[async_trait]
    impl ItemConfigurator for HangingConfigurator {
        async fn buyback_contracts(
            &self,
            _request: &BuybackContractsReq,
        ) -> std::result::Result<BuybackContractsRep, RpcError> {
            std::future::pending().await
        }
    }

    fn unavailable(message: &str) -> Outcome {
        Err(RpcError::Unavailable(message.to_string()))
    }

    fn reply(records: &[(&str, Option<(i64, i64)>)]) -> Outcome {
        Ok(BuybackContractsRep {
            contracts: records
                .iter()
                .map(|(hash_code, esi)| BuybackContract {
                    hash_code: hash_code.to_string(),
                    esi_contract: esi.map(|(issued, expires)| EsiContract { issued, expires }),
                })
                .collect(),
        })
    }

    fn fast_fetcher(stub: MockConfigurator) -> ContractFetcher<MockConfigurator> {
        ContractFetcher::new(stub, "refresh-token")
            .with_retry_policy(RetryPolicy::fixed(Duration::ZERO, 3))
    }

    #[tokio::test]
    async fn test_all_attempts_fail_returns_transport_failure() {
        let stub = MockConfigurator::new(vec![
            unavailable("first"),
            unavailable("second"),
            unavailable("third"),
        ]);
        let fetcher = fast_fetcher(stub.clone());

        let err = fetcher.fetch_contracts(&FetchContext::new()).await.unwrap_err();

        assert_eq!(stub.calls().await, 3);
        match err {
            ContractError::TransportFailure { attempts, source } => {
                assert_eq!(attempts, 3);
                assert_eq!(source.to_string(), "RPC endpoint unavailable: third");
            }
            other => panic!("expected TransportFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let stub = MockConfigurator::new(vec![
            unavailable("first"),
            unavailable("second"),
            reply(&[("A", Some((0, 3600)))]),
        ]);
        let fetcher = fast_fetcher(stub.clone());

        let contracts = fetcher.fetch_contracts(&FetchContext::new()).await.unwrap();

        assert_eq!(stub.calls().await, 3);
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].hash_code.as_str(), "A");
    }

    #[tokio::test]
    async fn test_success_stops_retrying() {
        let stub = MockConfigurator::new(vec![reply(&[]), unavailable("unused")]);
        let fetcher = fast_fetcher(stub.clone());

        let contracts = fetcher.fetch_contracts(&FetchContext::new()).await.unwrap();

        assert!(contracts.is_empty());
        assert_eq!(stub.calls().await, 1);
    }

    #[tokio::test]
    async fn test_malformed_record_is_not_retried() {
        let stub = MockConfigurator::new(vec![
            reply(&[("good", Some((1, 2))), ("bad", None)]),
            reply(&[("good", Some((1, 2)))]),
        ]);
        let fetcher = fast_fetcher(stub.clone());

        let err = fetcher.fetch_contracts(&FetchContext::new()).await.unwrap_err();

        assert_eq!(stub.calls().await, 1);
        match err {
            ContractError::MalformedRecord {
                index, hash_code, ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(hash_code, "bad");
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_is_identical_across_attempts() {
        let stub = MockConfigurator::new(vec![
            unavailable("first"),
            unavailable("second"),
            unavailable("third"),
        ]);
        let fetcher = fast_fetcher(stub.clone());

        let _ = fetcher.fetch_contracts(&FetchContext::new()).await;

        let requests = stub.requests().await;
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r == &requests[0]));
        assert_eq!(requests[0], buyback_contracts_request("refresh-token"));
    }

    #[tokio::test]
    async fn test_no_retry_policy_makes_single_attempt() {
        let stub = MockConfigurator::new(vec![unavailable("down"), reply(&[])]);
        let fetcher =
            ContractFetcher::new(stub.clone(), "t").with_retry_policy(RetryPolicy::no_retry());

        let err = fetcher.fetch_contracts(&FetchContext::new()).await.unwrap_err();

        assert!(matches!(err, ContractError::TransportFailure { attempts: 1, .. }));
        assert_eq!(stub.calls().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_policy_waits_between_attempts() {
        let stub = MockConfigurator::new(vec![
            unavailable("first"),
            unavailable("second"),
            reply(&[("A", Some((5, 6)))]),
        ]);
        let fetcher = ContractFetcher::new(stub.clone(), "t");
        let started = Instant::now();

        let contracts = fetcher.fetch_contracts(&FetchContext::new()).await.unwrap();

        assert_eq!(contracts.len(), 1);
        assert_eq!(started.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_backoff() {
        let stub = MockConfigurator::new(vec![unavailable("first"), reply(&[])]);
        let fetcher = ContractFetcher::new(stub.clone(), "t");
        let token = CancellationToken::new();
        let ctx = FetchContext::with_cancellation(token.clone());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            token.cancel();
        });

        let started = Instant::now();
        let err = fetcher.fetch_contracts(&ctx).await.unwrap_err();

        assert!(matches!(err, ContractError::Cancelled));
        assert_eq!(stub.calls().await, 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_interrupts_in_flight_call() {
        let fetcher = ContractFetcher::new(HangingConfigurator, "t");
        let ctx = FetchContext::new().with_timeout(Duration::from_secs(30));

        let err = fetcher.fetch_contracts(&ctx).await.unwrap_err();

        assert!(matches!(err, ContractError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_already_cancelled_context_makes_no_call() {
        let stub = MockConfigurator::new(vec![reply(&[])]);
        let fetcher = fast_fetcher(stub.clone());
        let ctx = FetchContext::new();
        ctx.cancel();

        let result = fetcher.fetch_contracts(&ctx).await;

        tokio_test::assert_err!(result);
        assert_eq!(stub.calls().await, 0);
    }
}
