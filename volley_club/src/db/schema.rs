//! Idempotent schema bootstrap.
//!
//! Tables are created in dependency order so every foreign key points at a
//! table that already exists.

use sqlx::PgPool;

/// `(table, CREATE TABLE IF NOT EXISTS ...)` in creation order.
pub const TABLES: &[(&str, &str)] = &[
    (
        "tutores",
        r#"
        CREATE TABLE IF NOT EXISTS tutores (
            id BIGSERIAL PRIMARY KEY,
            nombre VARCHAR(100) NOT NULL,
            apellido_paterno VARCHAR(50) NOT NULL,
            apellido_materno VARCHAR(50),
            telefono VARCHAR(20) NOT NULL,
            email VARCHAR(100) UNIQUE,
            direccion TEXT,
            ocupacion VARCHAR(100),
            notas TEXT,
            activo BOOLEAN NOT NULL DEFAULT TRUE,
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            ultima_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "equipos",
        r#"
        CREATE TABLE IF NOT EXISTS equipos (
            id BIGSERIAL PRIMARY KEY,
            nombre VARCHAR(100) NOT NULL,
            categoria VARCHAR(50) NOT NULL,
            descripcion TEXT,
            entrenador_principal VARCHAR(100),
            entrenador_asistente VARCHAR(100),
            temporada VARCHAR(50),
            activo BOOLEAN NOT NULL DEFAULT TRUE,
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            ultima_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "jugadoras",
        r#"
        CREATE TABLE IF NOT EXISTS jugadoras (
            id BIGSERIAL PRIMARY KEY,
            nombre VARCHAR(100) NOT NULL,
            apellido_paterno VARCHAR(50) NOT NULL,
            apellido_materno VARCHAR(50),
            fecha_nacimiento DATE NOT NULL,
            categoria VARCHAR(50) NOT NULL,
            posicion VARCHAR(50),
            numero_uniforme INTEGER,
            altura NUMERIC(5, 2),
            peso NUMERIC(5, 2),
            tutor_id BIGINT REFERENCES tutores(id) ON DELETE SET NULL,
            tutor_secundario_id BIGINT REFERENCES tutores(id) ON DELETE SET NULL,
            telefono VARCHAR(20),
            email VARCHAR(100) UNIQUE,
            direccion TEXT,
            escuela VARCHAR(100),
            grado_escolar VARCHAR(50),
            alergias TEXT,
            condiciones_medicas TEXT,
            notas TEXT,
            activo BOOLEAN NOT NULL DEFAULT TRUE,
            fecha_ingreso DATE,
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            ultima_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "equipo_jugadora",
        r#"
        CREATE TABLE IF NOT EXISTS equipo_jugadora (
            id BIGSERIAL PRIMARY KEY,
            equipo_id BIGINT NOT NULL REFERENCES equipos(id) ON DELETE CASCADE,
            jugadora_id BIGINT NOT NULL REFERENCES jugadoras(id) ON DELETE CASCADE,
            fecha_asignacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (equipo_id, jugadora_id)
        )
        "#,
    ),
    (
        "torneos",
        r#"
        CREATE TABLE IF NOT EXISTS torneos (
            id BIGSERIAL PRIMARY KEY,
            nombre VARCHAR(100) NOT NULL,
            ubicacion VARCHAR(100),
            fecha_inicio DATE NOT NULL,
            fecha_fin DATE NOT NULL,
            descripcion TEXT,
            organizador VARCHAR(100),
            costo NUMERIC(10, 2),
            notas TEXT,
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            ultima_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "partidos",
        r#"
        CREATE TABLE IF NOT EXISTS partidos (
            id BIGSERIAL PRIMARY KEY,
            torneo_id BIGINT REFERENCES torneos(id) ON DELETE SET NULL,
            equipo_local_id BIGINT REFERENCES equipos(id) ON DELETE SET NULL,
            equipo_visitante VARCHAR(100) NOT NULL,
            fecha DATE NOT NULL,
            hora TIME NOT NULL,
            ubicacion VARCHAR(100),
            resultado_local INTEGER,
            resultado_visitante INTEGER,
            notas TEXT,
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            ultima_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "estadisticas_partido",
        r#"
        CREATE TABLE IF NOT EXISTS estadisticas_partido (
            id BIGSERIAL PRIMARY KEY,
            partido_id BIGINT NOT NULL REFERENCES partidos(id) ON DELETE CASCADE,
            jugadora_id BIGINT NOT NULL REFERENCES jugadoras(id) ON DELETE CASCADE,
            puntos INTEGER NOT NULL DEFAULT 0,
            aces INTEGER NOT NULL DEFAULT 0,
            servicios INTEGER NOT NULL DEFAULT 0,
            ataques INTEGER NOT NULL DEFAULT 0,
            bloqueos INTEGER NOT NULL DEFAULT 0,
            asistencias INTEGER NOT NULL DEFAULT 0,
            recepciones INTEGER NOT NULL DEFAULT 0,
            defensas INTEGER NOT NULL DEFAULT 0,
            errores INTEGER NOT NULL DEFAULT 0,
            minutos_jugados INTEGER NOT NULL DEFAULT 0,
            notas TEXT,
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            ultima_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "jugadora_torneo",
        r#"
        CREATE TABLE IF NOT EXISTS jugadora_torneo (
            id BIGSERIAL PRIMARY KEY,
            jugadora_id BIGINT NOT NULL REFERENCES jugadoras(id) ON DELETE CASCADE,
            torneo_id BIGINT NOT NULL REFERENCES torneos(id) ON DELETE CASCADE,
            fecha_asignacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            notas TEXT,
            UNIQUE (jugadora_id, torneo_id)
        )
        "#,
    ),
    (
        "pagos",
        r#"
        CREATE TABLE IF NOT EXISTS pagos (
            id BIGSERIAL PRIMARY KEY,
            jugadora_id BIGINT NOT NULL REFERENCES jugadoras(id) ON DELETE CASCADE,
            tutor_id BIGINT REFERENCES tutores(id) ON DELETE SET NULL,
            concepto VARCHAR(100) NOT NULL,
            monto NUMERIC(10, 2) NOT NULL,
            fecha_pago DATE NOT NULL,
            metodo_pago VARCHAR(50),
            referencia VARCHAR(100),
            estado VARCHAR(20) NOT NULL DEFAULT 'pendiente',
            comprobante VARCHAR(255),
            notas TEXT,
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            ultima_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
];

/// Create every table that does not exist yet.
///
/// # Errors
///
/// Returns the first failing statement's error; tables created before it
/// are left in place.
pub async fn initialize(pool: &PgPool) -> Result<(), sqlx::Error> {
    log::info!("Verifying database schema ({} tables)", TABLES.len());

    for (table, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await.map_err(|e| {
            log::error!("Failed to create table {}: {}", table, e);
            e
        })?;
        log::debug!("Table {} ready", table);
    }

    log::info!("Database schema ready");
    Ok(())
}
