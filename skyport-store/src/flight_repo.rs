use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyport_core::repository::{FlightStore, StoreError, StoreResult};
use skyport_domain::{Flight, Passenger};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

const COLUMNS: &str = "flight_number, origin, destination, scheduled_departure, scheduled_arrival, \
                       passengers, version, created_at, last_modified_at";

/// Flights table with the passenger roster embedded as a JSONB document, so a
/// flight and its passengers are always written and deleted together.
pub struct PostgresFlightStore {
    pool: PgPool,
}

impl PostgresFlightStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, binds: QueryBinds<'_>) -> StoreResult<Vec<Flight>> {
        let query = sqlx::query_as::<_, FlightRow>(sql);
        let query = match binds {
            QueryBinds::None => query,
            QueryBinds::Text(a, b) => query.bind(a).bind(b),
            QueryBinds::Range(start, end) => query.bind(start).bind(end),
        };

        let rows = query.fetch_all(&self.pool).await.map_err(StoreError::backend)?;
        rows.into_iter().map(Flight::try_from).collect()
    }
}

enum QueryBinds<'a> {
    None,
    Text(&'a str, &'a str),
    Range(DateTime<Utc>, DateTime<Utc>),
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    flight_number: String,
    origin: String,
    destination: String,
    scheduled_departure: DateTime<Utc>,
    scheduled_arrival: DateTime<Utc>,
    passengers: Json<Vec<Passenger>>,
    version: i64,
    created_at: Option<DateTime<Utc>>,
    last_modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<FlightRow> for Flight {
    type Error = StoreError;

    fn try_from(row: FlightRow) -> Result<Self, Self::Error> {
        Flight::builder()
            .flight_number(row.flight_number)
            .origin(row.origin)
            .destination(row.destination)
            .scheduled_departure(row.scheduled_departure)
            .scheduled_arrival(row.scheduled_arrival)
            .passengers(row.passengers.0)
            .version(row.version)
            .created_at(row.created_at)
            .last_modified_at(row.last_modified_at)
            .build()
            .map_err(StoreError::backend)
    }
}

#[async_trait]
impl FlightStore for PostgresFlightStore {
    async fn find_by_flight_number(&self, flight_number: &str) -> StoreResult<Option<Flight>> {
        let sql = format!("SELECT {} FROM flights WHERE flight_number = $1", COLUMNS);
        let row = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(flight_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.map(Flight::try_from).transpose()
    }

    async fn find_all(&self) -> StoreResult<Vec<Flight>> {
        let sql = format!(
            "SELECT {} FROM flights ORDER BY scheduled_departure, flight_number",
            COLUMNS
        );
        self.fetch(&sql, QueryBinds::None).await
    }

    async fn save(&self, flight: &Flight) -> StoreResult<Flight> {
        let mut saved = flight.clone();
        saved.record_save(Utc::now());
        let passengers = Json(saved.passengers().to_vec());

        let result = if flight.version() == 0 {
            sqlx::query(
                r#"
                INSERT INTO flights (flight_number, origin, destination, scheduled_departure,
                                     scheduled_arrival, passengers, version, created_at,
                                     last_modified_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (flight_number) DO NOTHING
                "#,
            )
            .bind(saved.flight_number())
            .bind(saved.origin())
            .bind(saved.destination())
            .bind(saved.scheduled_departure())
            .bind(saved.scheduled_arrival())
            .bind(passengers)
            .bind(saved.version())
            .bind(saved.created_at())
            .bind(saved.last_modified_at())
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                r#"
                UPDATE flights
                SET origin = $2, destination = $3, scheduled_departure = $4, scheduled_arrival = $5,
                    passengers = $6, version = $7, last_modified_at = $8
                WHERE flight_number = $1 AND version = $9
                "#,
            )
            .bind(saved.flight_number())
            .bind(saved.origin())
            .bind(saved.destination())
            .bind(saved.scheduled_departure())
            .bind(saved.scheduled_arrival())
            .bind(passengers)
            .bind(saved.version())
            .bind(saved.last_modified_at())
            .bind(flight.version())
            .execute(&self.pool)
            .await
        };
        let result = result.map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            return Err(if flight.version() == 0 {
                StoreError::DuplicateFlightNumber(flight.flight_number().to_string())
            } else {
                StoreError::VersionConflict {
                    flight_number: flight.flight_number().to_string(),
                    expected: flight.version(),
                }
            });
        }

        debug!("Saved flight {} at version {}", saved.flight_number(), saved.version());
        Ok(saved)
    }

    async fn delete_by_flight_number(&self, flight_number: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM flights WHERE flight_number = $1")
            .bind(flight_number)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_route(&self, origin: &str, destination: &str) -> StoreResult<Vec<Flight>> {
        let sql = format!(
            "SELECT {} FROM flights WHERE origin = $1 AND destination = $2 \
             ORDER BY scheduled_departure, flight_number",
            COLUMNS
        );
        self.fetch(&sql, QueryBinds::Text(origin, destination)).await
    }

    async fn find_by_departure_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Flight>> {
        let sql = format!(
            "SELECT {} FROM flights WHERE scheduled_departure >= $1 AND scheduled_departure <= $2 \
             ORDER BY scheduled_departure, flight_number",
            COLUMNS
        );
        self.fetch(&sql, QueryBinds::Range(start, end)).await
    }

    async fn count(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flights")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(count.max(0) as u64)
    }
}
