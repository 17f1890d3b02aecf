//! Transactional cascade deletes.
//!
//! Deleting a player or a tournament touches several tables. The whole
//! sequence runs in one transaction: the target row is locked and re-checked,
//! dependents are cleaned up in a fixed order, the target is deleted and the
//! transaction commits. Any failure rolls everything back before the error is
//! returned.

use crate::errors::{ClubError, ClubResult};
use sqlx::{PgPool, Postgres, Transaction};

/// Ordered statements that remove one entity and everything hanging off it.
///
/// Every statement takes the target id as `$1`.
#[derive(Debug, Clone, Copy)]
pub struct CascadePlan {
    /// Table name, for logs
    pub table: &'static str,
    /// Locks the target row; must return a row when it exists
    pub lock: &'static str,
    /// Dependent cleanup, run in order
    pub steps: &'static [&'static str],
    /// Removes the target row
    pub delete: &'static str,
    /// `NotFound` message when the target is gone
    pub not_found: &'static str,
}

/// Player deletion: payments, match statistics, team and tournament links.
pub const PLAYER_CASCADE: CascadePlan = CascadePlan {
    table: "jugadoras",
    lock: "SELECT id FROM jugadoras WHERE id = $1 FOR UPDATE",
    steps: &[
        "DELETE FROM pagos WHERE jugadora_id = $1",
        "DELETE FROM estadisticas_partido WHERE jugadora_id = $1",
        "DELETE FROM equipo_jugadora WHERE jugadora_id = $1",
        "DELETE FROM jugadora_torneo WHERE jugadora_id = $1",
    ],
    delete: "DELETE FROM jugadoras WHERE id = $1",
    not_found: "Jugadora no encontrada para eliminar",
};

/// Tournament deletion: roster links removed, matches detached but kept.
pub const TOURNAMENT_CASCADE: CascadePlan = CascadePlan {
    table: "torneos",
    lock: "SELECT id FROM torneos WHERE id = $1 FOR UPDATE",
    steps: &[
        "DELETE FROM jugadora_torneo WHERE torneo_id = $1",
        "UPDATE partidos SET torneo_id = NULL WHERE torneo_id = $1",
    ],
    delete: "DELETE FROM torneos WHERE id = $1",
    not_found: "Torneo no encontrado para eliminar",
};

/// Run `plan` for `id` as a single transaction.
///
/// # Errors
///
/// * `ClubError::NotFound` - The target vanished before the lock was taken
/// * `ClubError::Database` - Any statement, the commit or the begin failed
pub async fn delete_with_cascade(pool: &PgPool, plan: &CascadePlan, id: i64) -> ClubResult<()> {
    let mut tx = pool.begin().await?;

    match run_plan(&mut tx, plan, id).await {
        Ok(()) => {
            tx.commit().await?;
            log::info!("Deleted {} {} with dependents", plan.table, id);
            Ok(())
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                log::error!(
                    "Rollback of {} {} delete failed: {}",
                    plan.table,
                    id,
                    rollback_err
                );
            } else if err.is_internal() {
                log::warn!("Rolled back {} {} delete: {}", plan.table, id, err);
            }
            Err(err)
        }
    }
}

async fn run_plan(tx: &mut Transaction<'_, Postgres>, plan: &CascadePlan, id: i64) -> ClubResult<()> {
    // Re-check under lock: a concurrent delete may have won since the pre-check.
    let locked = sqlx::query(plan.lock)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    if locked.is_none() {
        return Err(ClubError::NotFound(plan.not_found.to_string()));
    }

    for step in plan.steps {
        let result = sqlx::query(step).bind(id).execute(&mut **tx).await?;
        log::debug!("{} ({} rows)", step, result.rows_affected());
    }

    let deleted = sqlx::query(plan.delete).bind(id).execute(&mut **tx).await?;
    if deleted.rows_affected() == 0 {
        return Err(ClubError::NotFound(plan.not_found.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_cleanup_order() {
        let tables: Vec<_> = PLAYER_CASCADE
            .steps
            .iter()
            .map(|s| s.split_whitespace().nth(2).unwrap())
            .collect();
        assert_eq!(
            tables,
            vec!["pagos", "estadisticas_partido", "equipo_jugadora", "jugadora_torneo"]
        );
    }

    #[test]
    fn test_tournament_detaches_matches() {
        assert!(TOURNAMENT_CASCADE.steps[0].starts_with("DELETE FROM jugadora_torneo"));
        assert!(TOURNAMENT_CASCADE.steps[1].contains("SET torneo_id = NULL"));
        assert!(!TOURNAMENT_CASCADE.steps.iter().any(|s| s.starts_with("DELETE FROM partidos")));
    }

    #[test]
    fn test_plans_lock_their_target() {
        for plan in [PLAYER_CASCADE, TOURNAMENT_CASCADE] {
            assert!(plan.lock.ends_with("FOR UPDATE"));
            assert!(plan.delete.contains(plan.table));
        }
    }
}
