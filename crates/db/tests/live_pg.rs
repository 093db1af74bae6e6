//! Round trips against a live Postgres.
//!
//! Ignored by default; run with `DATABASE_URL` set and `--ignored`.

use caller::{CallConfig, CallError, CallFunction};
use db::{pool::create_pool, PgExecutor, PoolConfig};
use serde_json::{json, Value};

async fn executor() -> PgExecutor {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // One connection so pg_temp objects stay visible across queries.
    let pool = create_pool(&PoolConfig::new(url).max_connections(1))
        .await
        .expect("failed to connect to database");
    PgExecutor::new(pool)
}

async fn create(client: &PgExecutor, ddl: &str) {
    sqlx::query(ddl).execute(client.pool()).await.unwrap();
}

async fn call(client: &PgExecutor, function: &str, inputs: &[Value]) -> Vec<Value> {
    client
        .call_function(function, inputs)
        .await
        .unwrap()
        .into_values()
}

#[tokio::test]
#[ignore]
async fn calls_function_with_in_and_out_parameters() {
    let client = executor().await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.bump(n int8, label text, OUT total int8, OUT tagged text) \
         AS $$ SELECT n + 1, label || '!' $$ LANGUAGE sql",
    )
    .await;

    let outputs = call(&client, "pg_temp.bump", &[json!(41), json!("hi")]).await;
    assert_eq!(outputs, vec![json!(42), json!("hi!")]);
}

#[tokio::test]
#[ignore]
async fn number_binds_to_int4_parameter() {
    let client = executor().await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.add_one(n int4) RETURNS int4 AS $$ SELECT n + 1 $$ LANGUAGE sql",
    )
    .await;

    assert_eq!(call(&client, "pg_temp.add_one", &[json!(41)]).await, vec![json!(42)]);
}

#[tokio::test]
#[ignore]
async fn string_binds_to_date_parameter() {
    let client = executor().await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.next_day(d date) RETURNS date AS $$ SELECT d + 1 $$ LANGUAGE sql",
    )
    .await;

    let outputs = call(&client, "pg_temp.next_day", &[json!("2020-02-28")]).await;
    assert_eq!(outputs, vec![json!("2020-02-29")]);
}

#[tokio::test]
#[ignore]
async fn null_binds_to_int8_parameter() {
    let client = executor().await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.is_missing(n int8) RETURNS bool AS $$ SELECT n IS NULL $$ LANGUAGE sql",
    )
    .await;

    assert_eq!(call(&client, "pg_temp.is_missing", &[Value::Null]).await, vec![json!(true)]);
}

#[tokio::test]
#[ignore]
async fn every_json_shape_round_trips_through_typed_parameters() {
    let client = executor().await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.echo(i int4, n numeric, d date, u uuid, b bool, \
         OUT oi int4, OUT onum numeric, OUT od date, OUT ou uuid, OUT ob bool) \
         AS $$ SELECT i, n, d, u, b $$ LANGUAGE sql",
    )
    .await;

    let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    let cases = [
        (
            vec![json!(7), json!(1.5), json!("2024-03-01"), json!(id), json!(true)],
            vec![json!(7), json!("1.5"), json!("2024-03-01"), json!(id), json!(true)],
        ),
        (
            vec![json!("-3"), json!("1.50"), json!(" 2024-12-31 "), json!(id.to_uppercase()), json!("f")],
            vec![json!(-3), json!("1.50"), json!("2024-12-31"), json!(id), json!(false)],
        ),
        (vec![Value::Null; 5], vec![Value::Null; 5]),
    ];

    for (inputs, expected) in cases {
        assert_eq!(call(&client, "pg_temp.echo", &inputs).await, expected, "{inputs:?}");
    }
}

#[tokio::test]
#[ignore]
async fn numeric_out_column_keeps_its_digits() {
    let client = executor().await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.price(OUT amount numeric) \
         AS $$ SELECT 12345678901234.5678::numeric $$ LANGUAGE sql",
    )
    .await;

    assert_eq!(call(&client, "pg_temp.price", &[]).await, vec![json!("12345678901234.5678")]);
}

#[tokio::test]
#[ignore]
async fn time_interval_bytea_and_array_columns_decode() {
    let client = executor().await;
    create(
        &client,
        r"CREATE FUNCTION pg_temp.misc(OUT t time, OUT i interval, OUT b bytea, OUT tags text[])
          AS $$ SELECT '10:30:00'::time, '1 mon 2 days 00:00:03'::interval,
                       '\xdeadbeef'::bytea, ARRAY['a', NULL] $$ LANGUAGE sql",
    )
    .await;

    let outputs = call(&client, "pg_temp.misc", &[]).await;
    assert_eq!(
        outputs,
        vec![
            json!("10:30:00"),
            json!({ "months": 1, "days": 2, "microseconds": 3_000_000 }),
            json!("\\xdeadbeef"),
            json!(["a", null]),
        ]
    );
}

#[tokio::test]
#[ignore]
async fn array_and_enum_parameters_bind() {
    let client = executor().await;
    create(&client, "CREATE TYPE pg_temp.mood AS ENUM ('sad', 'happy')").await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.total(xs int4[]) RETURNS int8 \
         AS $$ SELECT sum(x) FROM unnest(xs) AS x $$ LANGUAGE sql",
    )
    .await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.cheer(m pg_temp.mood) RETURNS pg_temp.mood \
         AS $$ SELECT 'happy'::pg_temp.mood WHERE m IS NOT NULL $$ LANGUAGE sql",
    )
    .await;

    assert_eq!(call(&client, "pg_temp.total", &[json!([1, null, 3])]).await, vec![json!(4)]);
    assert_eq!(call(&client, "pg_temp.cheer", &[json!("sad")]).await, vec![json!("happy")]);
}

#[tokio::test]
#[ignore]
async fn config_request_with_persistent_option() {
    let client = executor().await;

    let config = CallConfig::new("pg_catalog.lower").with_option("persistent", json!(false));
    let outputs = client.call_function(config, &[json!("ABC")]).await.unwrap();
    assert_eq!(outputs.into_values(), vec![json!("abc")]);
}

#[tokio::test]
#[ignore]
async fn unknown_function_surfaces_database_error() {
    let client = executor().await;

    let err = client.call_function("no_such_function", &[]).await.unwrap_err();
    assert!(matches!(err, CallError::Executor(db::DbError::Sqlx(_))));
}

#[tokio::test]
#[ignore]
async fn unconvertible_input_names_its_parameter() {
    let client = executor().await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.next_week(d date) RETURNS date AS $$ SELECT d + 7 $$ LANGUAGE sql",
    )
    .await;

    let err = client
        .call_function("pg_temp.next_week", &[json!("soon")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CallError::Executor(db::DbError::InvalidParameter { position: 1, .. })
    ));
}

#[tokio::test]
#[ignore]
async fn empty_set_returning_function_reports_no_row() {
    let client = executor().await;
    create(
        &client,
        "CREATE FUNCTION pg_temp.upto(n int4) RETURNS SETOF int4 \
         AS $$ SELECT generate_series(1, n) $$ LANGUAGE sql",
    )
    .await;

    let err = client.call_function("pg_temp.upto", &[json!(0)]).await.unwrap_err();
    assert!(matches!(err, CallError::NoRow { .. }));
}
