//! Integration tests for the entity repositories and cascading deletes.
//!
//! Run against a real PostgreSQL given by `DATABASE_URL`; every test is a
//! no-op when it is unset. Tests share tables, so they run serially.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use serial_test::serial;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use volley_club::ClubError;
use volley_club::db::{Database, DatabaseConfig, schema};
use volley_club::guardians::{GuardianInput, GuardianRepository};
use volley_club::payments::{PaymentFilter, PaymentInput, PaymentRepository, PaymentStatus};
use volley_club::players::{AssignmentInput, PlayerInput, PlayerRepository};
use volley_club::tournaments::{TournamentInput, TournamentRepository};
use volley_club::validation::FromBody;

/// Helper to create a test database pool, or `None` when no database is configured
async fn setup_test_db() -> Option<Arc<PgPool>> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let config = DatabaseConfig {
        database_url,
        max_connections: 5,
        min_connections: 1,
        connection_timeout_secs: 5,
        idle_timeout_secs: 300,
        max_lifetime_secs: 1800,
    };

    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    schema::initialize(db.pool())
        .await
        .expect("Failed to initialize schema");

    Some(Arc::new(db.pool().clone()))
}

/// Suffix that keeps unique columns from colliding across runs
fn unique_suffix() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}{}", std::process::id(), nanos % 1_000_000_000)
}

async fn create_guardian(pool: &Arc<PgPool>) -> i64 {
    let input = GuardianInput::from_body(&json!({
        "nombre": "Marta",
        "apellido_paterno": "Gómez",
        "telefono": "555-123-4567",
        "email": format!("marta{}@example.com", unique_suffix())
    }))
    .unwrap();
    GuardianRepository::new(pool.clone())
        .create(&input)
        .await
        .unwrap()
        .id
}

fn player_body(tutor_id: i64) -> Value {
    json!({
        "nombre": "Sofía",
        "apellido_paterno": "Ramos",
        "fecha_nacimiento": "2012-03-14",
        "categoria": "Infantil",
        "tutor_id": tutor_id,
        "altura": "1.55"
    })
}

async fn create_player(pool: &Arc<PgPool>, tutor_id: i64) -> i64 {
    let input = PlayerInput::from_body(&player_body(tutor_id)).unwrap();
    PlayerRepository::new(pool.clone())
        .create(&input)
        .await
        .unwrap()
        .id
}

async fn create_tournament(pool: &Arc<PgPool>) -> i64 {
    let input = TournamentInput::from_body(&json!({
        "nombre": "Copa Primavera",
        "fecha_inicio": "2025-04-05",
        "fecha_fin": "2025-04-06",
        "costo": 450
    }))
    .unwrap();
    TournamentRepository::new(pool.clone())
        .create(&input)
        .await
        .unwrap()
        .id
}

async fn count(pool: &PgPool, query: &str, id: i64) -> i64 {
    sqlx::query_scalar(query).bind(id).fetch_one(pool).await.unwrap()
}

// ============================================================================
// Guardians
// ============================================================================

#[tokio::test]
#[serial]
async fn test_guardian_crud_round_trip() {
    let Some(pool) = setup_test_db().await else { return };
    let guardians = GuardianRepository::new(pool.clone());

    let email = format!("Laura{}@Example.com", unique_suffix());
    let input = GuardianInput::from_body(&json!({
        "nombre": "Laura",
        "apellido_paterno": "Pérez",
        "telefono": "5551234567",
        "email": email
    }))
    .unwrap();

    let created = guardians.create(&input).await.unwrap();
    assert!(created.activo);
    assert_eq!(created.email.as_deref(), Some(email.to_lowercase().as_str()));

    let mut replacement = input.clone();
    replacement.activo = false;
    replacement.ocupacion = Some("Ingeniera".to_string());
    let updated = guardians.update(created.id, &replacement).await.unwrap();
    assert!(!updated.activo);
    assert_eq!(updated.ocupacion.as_deref(), Some("Ingeniera"));
    assert!(updated.ultima_actualizacion >= created.ultima_actualizacion);

    assert!(guardians.list().await.unwrap().iter().any(|g| g.id == created.id));

    guardians.delete(created.id).await.unwrap();
    let err = guardians.get_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, ClubError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_guardian_duplicate_email() {
    let Some(pool) = setup_test_db().await else { return };
    let guardians = GuardianRepository::new(pool.clone());

    let body = json!({
        "nombre": "Rosa",
        "apellido_paterno": "Luna",
        "telefono": "5550001111",
        "email": format!("rosa{}@example.com", unique_suffix())
    });
    let input = GuardianInput::from_body(&body).unwrap();
    let first = guardians.create(&input).await.unwrap();

    let err = guardians.create(&input).await.unwrap_err();
    assert!(matches!(err, ClubError::DuplicateValue(ref m) if m == "El email proporcionado ya está registrado."));

    guardians.delete(first.id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_guardian_missing_targets() {
    let Some(pool) = setup_test_db().await else { return };
    let guardians = GuardianRepository::new(pool.clone());

    let input = GuardianInput::from_body(&json!({
        "nombre": "Nadie",
        "apellido_paterno": "Nunca",
        "telefono": "5550000000"
    }))
    .unwrap();

    let err = guardians.update(i64::MAX, &input).await.unwrap_err();
    assert!(matches!(err, ClubError::NotFound(ref m) if m == "Tutor no encontrado para actualizar"));

    let err = guardians.delete(i64::MAX).await.unwrap_err();
    assert!(matches!(err, ClubError::NotFound(ref m) if m == "Tutor no encontrado para eliminar"));
}

#[tokio::test]
#[serial]
async fn test_guardian_delete_clears_player_reference() {
    let Some(pool) = setup_test_db().await else { return };
    let tutor_id = create_guardian(&pool).await;
    let player_id = create_player(&pool, tutor_id).await;

    GuardianRepository::new(pool.clone()).delete(tutor_id).await.unwrap();

    let players = PlayerRepository::new(pool.clone());
    let player = players.get_by_id(player_id).await.unwrap();
    assert_eq!(player.tutor_id, None);

    players.delete(player_id).await.unwrap();
}

// ============================================================================
// Players
// ============================================================================

#[tokio::test]
#[serial]
async fn test_player_requires_existing_guardian() {
    let Some(pool) = setup_test_db().await else { return };
    let input = PlayerInput::from_body(&player_body(i64::MAX)).unwrap();

    let err = PlayerRepository::new(pool.clone())
        .create(&input)
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::ReferenceInvalid(ref m) if m == "El ID del tutor proporcionado no existe."));
}

#[tokio::test]
#[serial]
async fn test_player_round_trip_keeps_decimals() {
    let Some(pool) = setup_test_db().await else { return };
    let tutor_id = create_guardian(&pool).await;
    let players = PlayerRepository::new(pool.clone());

    let player_id = create_player(&pool, tutor_id).await;
    let player = players.get_by_id(player_id).await.unwrap();
    assert_eq!(player.altura, Some(Decimal::new(155, 2)));
    assert_eq!(player.fecha_nacimiento, NaiveDate::from_ymd_opt(2012, 3, 14).unwrap());
    assert!(player.activo);

    players.delete(player_id).await.unwrap();
    GuardianRepository::new(pool.clone()).delete(tutor_id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_assignment_lifecycle() {
    let Some(pool) = setup_test_db().await else { return };
    let tutor_id = create_guardian(&pool).await;
    let player_id = create_player(&pool, tutor_id).await;
    let tournament_id = create_tournament(&pool).await;
    let players = PlayerRepository::new(pool.clone());
    let tournaments = TournamentRepository::new(pool.clone());

    let notes = AssignmentInput::from_body(&json!({ "notas": "Titular" })).unwrap();
    players.assign_tournament(player_id, tournament_id, &notes).await.unwrap();

    let err = players
        .assign_tournament(player_id, tournament_id, &notes)
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::DuplicateValue(_)));

    let assigned = players.tournaments(player_id).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, tournament_id);

    let roster = tournaments.players(tournament_id).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, player_id);
    assert_eq!(roster[0].categoria, "Infantil");

    players.unassign_tournament(player_id, tournament_id).await.unwrap();
    let err = players
        .unassign_tournament(player_id, tournament_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::NotFound(ref m) if m == "Asignación no encontrada"));

    let err = players
        .assign_tournament(player_id, i64::MAX, &AssignmentInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::ReferenceInvalid(_)));

    players.delete(player_id).await.unwrap();
    tournaments.delete(tournament_id).await.unwrap();
    GuardianRepository::new(pool.clone()).delete(tutor_id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_player_delete_cascades() {
    let Some(pool) = setup_test_db().await else { return };
    let tutor_id = create_guardian(&pool).await;
    let player_id = create_player(&pool, tutor_id).await;
    let tournament_id = create_tournament(&pool).await;
    let players = PlayerRepository::new(pool.clone());

    players
        .assign_tournament(player_id, tournament_id, &AssignmentInput::default())
        .await
        .unwrap();

    let payment = PaymentInput::from_body(&json!({
        "jugadora_id": player_id,
        "concepto": "Inscripción",
        "monto": 200,
        "fecha_pago": "2025-03-01",
        "estado": "pagado"
    }))
    .unwrap();
    PaymentRepository::new(pool.clone()).create(&payment).await.unwrap();

    let team_id: i64 = sqlx::query_scalar(
        "INSERT INTO equipos (nombre, categoria) VALUES ('Águilas', 'Infantil') RETURNING id",
    )
    .fetch_one(pool.as_ref())
    .await
    .unwrap();
    sqlx::query("INSERT INTO equipo_jugadora (equipo_id, jugadora_id) VALUES ($1, $2)")
        .bind(team_id)
        .bind(player_id)
        .execute(pool.as_ref())
        .await
        .unwrap();
    let match_id: i64 = sqlx::query_scalar(
        "INSERT INTO partidos (torneo_id, equipo_local_id, equipo_visitante, fecha, hora) \
         VALUES ($1, $2, 'Halcones', '2025-04-05', '10:00') RETURNING id",
    )
    .bind(tournament_id)
    .bind(team_id)
    .fetch_one(pool.as_ref())
    .await
    .unwrap();
    sqlx::query("INSERT INTO estadisticas_partido (partido_id, jugadora_id, puntos) VALUES ($1, $2, 7)")
        .bind(match_id)
        .bind(player_id)
        .execute(pool.as_ref())
        .await
        .unwrap();

    players.delete(player_id).await.unwrap();

    for query in [
        "SELECT COUNT(*) FROM jugadoras WHERE id = $1",
        "SELECT COUNT(*) FROM pagos WHERE jugadora_id = $1",
        "SELECT COUNT(*) FROM estadisticas_partido WHERE jugadora_id = $1",
        "SELECT COUNT(*) FROM equipo_jugadora WHERE jugadora_id = $1",
        "SELECT COUNT(*) FROM jugadora_torneo WHERE jugadora_id = $1",
    ] {
        assert_eq!(count(&pool, query, player_id).await, 0, "{query}");
    }

    let err = players.delete(player_id).await.unwrap_err();
    assert!(matches!(err, ClubError::NotFound(ref m) if m == "Jugadora no encontrada para eliminar"));

    TournamentRepository::new(pool.clone()).delete(tournament_id).await.unwrap();
    sqlx::query("DELETE FROM partidos WHERE id = $1")
        .bind(match_id)
        .execute(pool.as_ref())
        .await
        .unwrap();
    sqlx::query("DELETE FROM equipos WHERE id = $1")
        .bind(team_id)
        .execute(pool.as_ref())
        .await
        .unwrap();
    GuardianRepository::new(pool.clone()).delete(tutor_id).await.unwrap();
}

// ============================================================================
// Tournaments
// ============================================================================

async fn set_assignment_delete_failure(pool: &PgPool, enabled: bool) {
    sqlx::query("DROP TRIGGER IF EXISTS fail_assignment_delete ON jugadora_torneo")
        .execute(pool)
        .await
        .unwrap();
    if !enabled {
        return;
    }
    sqlx::query(
        "CREATE OR REPLACE FUNCTION fail_assignment_delete() RETURNS trigger AS $$ \
         BEGIN RAISE EXCEPTION 'assignment delete refused'; END; $$ LANGUAGE plpgsql",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER fail_assignment_delete BEFORE DELETE ON jugadora_torneo \
         FOR EACH ROW EXECUTE FUNCTION fail_assignment_delete()",
    )
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
#[serial]
async fn test_player_delete_rolls_back_on_failed_step() {
    let Some(pool) = setup_test_db().await else { return };
    let tutor_id = create_guardian(&pool).await;
    let player_id = create_player(&pool, tutor_id).await;
    let tournament_id = create_tournament(&pool).await;
    let players = PlayerRepository::new(pool.clone());

    players
        .assign_tournament(player_id, tournament_id, &AssignmentInput::default())
        .await
        .unwrap();
    let payment = PaymentInput::from_body(&json!({
        "jugadora_id": player_id,
        "concepto": "Inscripción",
        "monto": 200,
        "fecha_pago": "2025-03-01",
        "estado": "pagado"
    }))
    .unwrap();
    PaymentRepository::new(pool.clone()).create(&payment).await.unwrap();

    set_assignment_delete_failure(&pool, true).await;
    let result = players.delete(player_id).await;
    set_assignment_delete_failure(&pool, false).await;

    let err = result.unwrap_err();
    assert!(matches!(err, ClubError::Database(_)), "{err:?}");

    // Payments go first in the cleanup order, so they must have been restored
    for query in [
        "SELECT COUNT(*) FROM jugadoras WHERE id = $1",
        "SELECT COUNT(*) FROM pagos WHERE jugadora_id = $1",
        "SELECT COUNT(*) FROM jugadora_torneo WHERE jugadora_id = $1",
    ] {
        assert_eq!(count(&pool, query, player_id).await, 1, "{query}");
    }

    players.delete(player_id).await.unwrap();
    TournamentRepository::new(pool.clone()).delete(tournament_id).await.unwrap();
    GuardianRepository::new(pool.clone()).delete(tutor_id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_concurrent_player_deletes() {
    let Some(pool) = setup_test_db().await else { return };
    let tutor_id = create_guardian(&pool).await;
    let player_id = create_player(&pool, tutor_id).await;
    let players = PlayerRepository::new(pool.clone());

    let (first, second) = tokio::join!(players.delete(player_id), players.delete(player_id));
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(ClubError::NotFound(m)) if m == "Jugadora no encontrada para eliminar"
    )));

    GuardianRepository::new(pool.clone()).delete(tutor_id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_tournament_delete_detaches_matches() {
    let Some(pool) = setup_test_db().await else { return };
    let tutor_id = create_guardian(&pool).await;
    let player_id = create_player(&pool, tutor_id).await;
    let tournament_id = create_tournament(&pool).await;
    let tournaments = TournamentRepository::new(pool.clone());

    PlayerRepository::new(pool.clone())
        .assign_tournament(player_id, tournament_id, &AssignmentInput::default())
        .await
        .unwrap();
    let match_id: i64 = sqlx::query_scalar(
        "INSERT INTO partidos (torneo_id, equipo_visitante, fecha, hora) \
         VALUES ($1, 'Halcones', '2025-04-05', '12:30') RETURNING id",
    )
    .bind(tournament_id)
    .fetch_one(pool.as_ref())
    .await
    .unwrap();

    tournaments.delete(tournament_id).await.unwrap();

    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM jugadora_torneo WHERE torneo_id = $1", tournament_id).await,
        0
    );
    let detached: Option<i64> = sqlx::query_scalar("SELECT torneo_id FROM partidos WHERE id = $1")
        .bind(match_id)
        .fetch_one(pool.as_ref())
        .await
        .unwrap();
    assert_eq!(detached, None);

    // The player survives the tournament.
    assert!(PlayerRepository::new(pool.clone()).get_by_id(player_id).await.is_ok());

    let err = tournaments.delete(tournament_id).await.unwrap_err();
    assert!(matches!(err, ClubError::NotFound(ref m) if m == "Torneo no encontrado para eliminar"));

    sqlx::query("DELETE FROM partidos WHERE id = $1")
        .bind(match_id)
        .execute(pool.as_ref())
        .await
        .unwrap();
    PlayerRepository::new(pool.clone()).delete(player_id).await.unwrap();
    GuardianRepository::new(pool.clone()).delete(tutor_id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_tournament_update_replaces_all_columns() {
    let Some(pool) = setup_test_db().await else { return };
    let tournaments = TournamentRepository::new(pool.clone());
    let tournament_id = create_tournament(&pool).await;

    let replacement = TournamentInput::from_body(&json!({
        "nombre": "Copa Verano",
        "fecha_inicio": "2025-07-01",
        "fecha_fin": "2025-07-03"
    }))
    .unwrap();
    let updated = tournaments.update(tournament_id, &replacement).await.unwrap();
    assert_eq!(updated.nombre, "Copa Verano");
    assert_eq!(updated.costo, None);

    tournaments.delete(tournament_id).await.unwrap();
}

// ============================================================================
// Payments
// ============================================================================

#[tokio::test]
#[serial]
async fn test_payment_filters() {
    let Some(pool) = setup_test_db().await else { return };
    let tutor_id = create_guardian(&pool).await;
    let player_id = create_player(&pool, tutor_id).await;
    let payments = PaymentRepository::new(pool.clone());

    let mut ids = Vec::new();
    for (date, status) in [
        ("2025-01-10", "pagado"),
        ("2025-02-10", "pendiente"),
        ("2025-03-10", "pagado"),
    ] {
        let input = PaymentInput::from_body(&json!({
            "jugadora_id": player_id,
            "tutor_id": tutor_id,
            "concepto": "Mensualidad",
            "monto": "300.00",
            "fecha_pago": date,
            "metodo_pago": "Efectivo",
            "estado": status
        }))
        .unwrap();
        let payment = payments.create(&input).await.unwrap();
        assert_eq!(payment.jugadora_nombre, "Sofía");
        assert_eq!(payment.metodo_pago.as_deref(), Some("Efectivo"));
        ids.push(payment.id);
    }

    let params: HashMap<String, String> = [
        ("jugadoraId".to_string(), player_id.to_string()),
        ("estado".to_string(), "PAGADO".to_string()),
    ]
    .into_iter()
    .collect();
    let paid = payments.list(&PaymentFilter::from_query(&params)).await.unwrap();
    assert_eq!(paid.len(), 2);
    assert!(paid.iter().all(|p| p.estado == PaymentStatus::Pagado.as_str()));
    // Latest payment date first
    assert_eq!(paid[0].id, ids[2]);
    assert_eq!(paid[1].id, ids[0]);

    let ranged = payments
        .list(&PaymentFilter {
            jugadora_id: Some(player_id),
            fecha_inicio: NaiveDate::from_ymd_opt(2025, 2, 1),
            fecha_fin: NaiveDate::from_ymd_opt(2025, 2, 28),
            estado: None,
        })
        .await
        .unwrap();
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0].id, ids[1]);

    for id in ids {
        payments.delete(id).await.unwrap();
    }
    let err = payments.delete(i64::MAX).await.unwrap_err();
    assert!(matches!(err, ClubError::NotFound(ref m) if m == "Pago no encontrado para eliminar"));

    PlayerRepository::new(pool.clone()).delete(player_id).await.unwrap();
    GuardianRepository::new(pool.clone()).delete(tutor_id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_payment_unknown_player() {
    let Some(pool) = setup_test_db().await else { return };
    let input = PaymentInput::from_body(&json!({
        "jugadora_id": i64::MAX,
        "concepto": "Uniforme",
        "monto": 150,
        "fecha_pago": "2025-05-01",
        "estado": " Pendiente "
    }))
    .unwrap();
    assert_eq!(input.estado, PaymentStatus::Pendiente);

    let err = PaymentRepository::new(pool.clone())
        .create(&input)
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::ReferenceInvalid(_)));

    let stored = count(&pool, "SELECT COUNT(*) FROM pagos WHERE jugadora_id = $1", i64::MAX).await;
    assert_eq!(stored, 0);
}
