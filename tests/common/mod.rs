#![allow(dead_code)]

use correlation_matrix_wasm::infrastructure::{
    ApiConfig, CorrelationApi, RequestClient,
    http::{Delay, HttpRequest, HttpResponse, HttpTransport, TransportError},
};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

pub const BASE_URL: &str = "http://localhost:5000/api";

/// What the fake server does with one request
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    Unreachable,
    /// Never answers
    Hang,
}

impl Reply {
    pub fn json(body: Value) -> Self {
        Reply::Status(200, body.to_string())
    }
}

#[derive(Default)]
struct MockState {
    routes: HashMap<String, VecDeque<Reply>>,
    requests: Vec<HttpRequest>,
}

/// Scripted transport. Replies queue per endpoint; the last one repeats.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, endpoint: &str, reply: Reply) -> &Self {
        self.state
            .borrow_mut()
            .routes
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn json(&self, endpoint: &str, body: Value) -> &Self {
        self.reply(endpoint, Reply::json(body))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn total_calls(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        let url = format!("{}{}", BASE_URL, endpoint);
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    /// JSON body of the most recent request to `endpoint`
    pub fn last_body(&self, endpoint: &str) -> Option<Value> {
        let url = format!("{}{}", BASE_URL, endpoint);
        self.state
            .borrow()
            .requests
            .iter()
            .rev()
            .find(|r| r.url == url)
            .and_then(|r| r.body.as_deref())
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        let endpoint = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        let mut state = self.state.borrow_mut();
        state.requests.push(request);
        let reply = state.routes.get_mut(&endpoint).and_then(|queue| {
            if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
        });
        match reply {
            Some(Reply::Status(status, body)) => futures::future::ready(Ok(HttpResponse { status, body })).boxed_local(),
            Some(Reply::Unreachable) => {
                futures::future::ready(Err(TransportError::Unreachable("connection refused".to_string()))).boxed_local()
            }
            Some(Reply::Hang) => futures::future::pending().boxed_local(),
            None => futures::future::ready(Err(TransportError::Failed(format!("no route for {}", endpoint)))).boxed_local(),
        }
    }
}

/// Resolves immediately and remembers every requested duration
#[derive(Clone, Default)]
pub struct InstantDelay {
    slept: Rc<RefCell<Vec<Duration>>>,
}

impl InstantDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }
}

impl Delay for InstantDelay {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.slept.borrow_mut().push(duration);
        futures::future::ready(()).boxed_local()
    }
}

pub type MockApi = CorrelationApi<MockTransport, InstantDelay>;

pub fn mock_client(transport: &MockTransport, delay: &InstantDelay) -> RequestClient<MockTransport, InstantDelay> {
    RequestClient::new(ApiConfig::with_base_url(BASE_URL), transport.clone(), delay.clone())
}

pub fn mock_api(transport: &MockTransport, delay: &InstantDelay) -> MockApi {
    CorrelationApi::new(mock_client(transport, delay))
}

/// Four categories, at least two assets each. Gold is listed under a display
/// symbol that differs from its technical one.
pub fn catalog_json() -> Value {
    json!({
        "crypto": [
            {"symbol": "BTC", "name": "Bitcoin", "technical_symbol": "BTC"},
            {"symbol": "ETH", "name": "Ethereum", "technical_symbol": "ETH"},
            {"symbol": "SOL", "name": "Solana", "technical_symbol": "SOL"}
        ],
        "stocks": [
            {"symbol": "AAPL", "name": "Apple Inc.", "technical_symbol": "AAPL"},
            {"symbol": "MSFT", "name": "Microsoft", "technical_symbol": "MSFT"},
            {"symbol": "GOOGL", "name": "Alphabet", "technical_symbol": "GOOGL"}
        ],
        "etfs": [
            {"symbol": "SPY", "name": "S&P 500 ETF", "technical_symbol": "SPY"},
            {"symbol": "QQQ", "name": "Nasdaq 100 ETF", "technical_symbol": "QQQ"}
        ],
        "commodities": [
            {"symbol": "GOLD", "name": "Gold Futures", "technical_symbol": "GC=F"},
            {"symbol": "OIL", "name": "Crude Oil", "technical_symbol": "CL=F"}
        ]
    })
}

/// Correlation response for BTC, AAPL and GC=F
pub fn correlation_json() -> Value {
    json!({
        "correlation_matrix": {
            "BTC":  {"BTC": 1.0, "AAPL": 0.42, "GC=F": -0.12},
            "AAPL": {"BTC": 0.42, "AAPL": 1.0, "GC=F": 0.05},
            "GC=F": {"BTC": -0.12, "AAPL": 0.05, "GC=F": 1.0}
        },
        "assets": ["BTC", "AAPL", "GC=F"],
        "asset_names": {"BTC": "Bitcoin", "AAPL": "Apple Inc.", "GC=F": "Gold Futures"},
        "statistics": {
            "BTC": {
                "mean_return": 0.0021, "volatility": 0.034, "sharpe_ratio": 1.12,
                "skewness": -0.4, "kurtosis": 3.1, "max_return": 0.12, "min_return": -0.15,
                "positive_days": 190, "negative_days": 175, "total_days": 365
            },
            "AAPL": {
                "mean_return": 0.0009, "volatility": 0.017, "sharpe_ratio": 0.85,
                "skewness": 0.1, "kurtosis": 2.4, "max_return": 0.06, "min_return": -0.05,
                "positive_days": 130, "negative_days": 121, "total_days": 251
            },
            "GC=F": {
                "mean_return": -0.0002, "volatility": 0.009, "sharpe_ratio": -0.2,
                "skewness": 0.0, "kurtosis": 1.9, "max_return": 0.03, "min_return": -0.03,
                "positive_days": 120, "negative_days": 131, "total_days": 251
            }
        },
        "betas": {"BTC": 1.4, "AAPL": 1.1},
        "highly_correlated": {
            "positive": [{"asset1": "BTC", "asset2": "AAPL", "correlation": 0.42}],
            "negative": []
        },
        "performance_comparison": {"BTC": 85.2, "AAPL": 21.7, "GC=F": -3.4},
        "diversification_score": 0.55,
        "period": "1y",
        "data_points": 251,
        "start_date": "2024-01-02",
        "end_date": "2024-12-31"
    })
}

/// Mock server with health, catalog and correlation routes answering
pub fn healthy_backend() -> MockTransport {
    let transport = MockTransport::new();
    transport
        .json("/health", json!({"status": "ok"}))
        .json("/assets", catalog_json())
        .json("/correlation", correlation_json());
    transport
}
