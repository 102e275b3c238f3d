//! Compare opening a connection per job against leasing one from a pool.
//!
//! Connections are simulated: opening one costs `CONNECT_COST`, and every
//! query sleeps for `QUERY_COST`. Run with `RUST_LOG=debug` to see pool events.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::EnvFilter;

use lease_pool::{Pool, PoolConfig};

const JOBS: usize = 100;
const POOL_SIZE: usize = 10;
const CONNECT_COST: Duration = Duration::from_millis(5);
const QUERY_COST: Duration = Duration::from_millis(10);

#[derive(Clone, Debug)]
struct ConnectionConfig {
    username: String,
    password: String,
    hostname: String,
    dbname: String,
}

impl ConnectionConfig {
    fn dsn(&self) -> String {
        format!(
            "{}:{}@tcp({})/{}",
            self.username, self.password, self.hostname, self.dbname
        )
    }
}

#[derive(Debug)]
struct ConnectError(String);

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot connect to {}", self.0)
    }
}

impl std::error::Error for ConnectError {}

struct Connection {
    dsn: String,
}

impl Connection {
    fn open(config: &ConnectionConfig) -> Result<Self, ConnectError> {
        if config.hostname.is_empty() {
            return Err(ConnectError(config.dsn()));
        }
        thread::sleep(CONNECT_COST);
        Ok(Self { dsn: config.dsn() })
    }

    fn exec(&self, _query: &str) {
        thread::sleep(QUERY_COST);
    }
}

fn benchmark_non_pool(config: &ConnectionConfig) -> Duration {
    let start = Instant::now();
    let jobs: Vec<_> = (0..JOBS)
        .map(|_| {
            let config = config.clone();
            thread::spawn(move || -> Result<(), ConnectError> {
                let conn = Connection::open(&config)?;
                conn.exec("SELECT SLEEP(0.01);");
                Ok(())
            })
        })
        .collect();
    for job in jobs {
        job.join().expect("worker panicked").expect("query failed");
    }
    start.elapsed()
}

fn benchmark_pool(config: &ConnectionConfig) -> Result<Duration, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let conn_config = config.clone();
    let pool: Pool<Connection> = PoolConfig::new(move || Connection::open(&conn_config))
        .capacity(POOL_SIZE)
        .name("throttle")
        .dispose(|conn: Connection, info| {
            tracing::debug!(dsn = %conn.dsn, uses = info.acquire_count, "closing connection")
        })
        .build()?;

    let jobs: Vec<_> = (0..JOBS)
        .map(|_| {
            let pool = pool.clone();
            thread::spawn(move || -> Result<(), lease_pool::AcquireError> {
                let conn = pool.acquire()?;
                conn.exec("SELECT SLEEP(0.01);");
                Ok(())
            })
        })
        .collect();
    for job in jobs {
        job.join().expect("worker panicked")?;
    }
    let elapsed = start.elapsed();
    pool.close();
    Ok(elapsed)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ConnectionConfig {
        username: "root".into(),
        password: "secret".into(),
        hostname: "127.0.0.1:3306".into(),
        dbname: "test".into(),
    };

    let elapsed = benchmark_non_pool(&config);
    info!(?elapsed, jobs = JOBS, "benchmark without connection pool");

    let elapsed = benchmark_pool(&config)?;
    info!(
        ?elapsed,
        jobs = JOBS,
        pool_size = POOL_SIZE,
        "benchmark with connection pool"
    );
    Ok(())
}
