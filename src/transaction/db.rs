//! Database queries for storing, querying, and managing transactions.

use rusqlite::Connection;

use crate::{
    Error,
    transaction::{
        Transaction, TransactionId,
        model::{map_transaction_row, to_unix_millis},
        validation::{NewTransaction, TransactionFields},
    },
};

const SELECT_COLUMNS: &str = "id, user_id, name, amount, kind, description, created_at";

/// Create the transaction table in the database.
///
/// The CHECK constraints repeat the rules in
/// [TransactionFields::validate] so that the table cannot hold a record the
/// validator would reject.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL CHECK (length(user_id) > 0),
                name TEXT NOT NULL CHECK (length(name) >= 3),
                amount REAL NOT NULL CHECK (amount >= 0),
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                description TEXT,
                created_at INTEGER NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_created_at
            ON \"transaction\"(user_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction in the database.
///
/// The store assigns the ID. The creation time is stored with millisecond
/// precision and the returned transaction holds the stored value.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (id, user_id, name, amount, kind, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                TransactionId::new(),
                transaction.user_id,
                transaction.name,
                transaction.amount,
                transaction.kind,
                transaction.description,
                to_unix_millis(transaction.created_at),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction belonging to `user_id`, newest first.
///
/// Transactions created at the same instant are ordered by insertion, the
/// most recently inserted first. An unknown user has no transactions, which
/// is not an error.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_by_user(
    user_id: &str,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY created_at DESC, rowid DESC"
        ))?
        .query_map(&[(":user_id", &user_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Apply `patch` to the transaction `id` and return the updated transaction.
///
/// Fields missing from `patch` keep their stored values. The ID and creation
/// time cannot be changed. The merged record is validated before it is
/// written, and the read and write happen in one database transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::Validation] if the merged record violates the schema,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    patch: TransactionFields,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let tx = connection.unchecked_transaction()?;

    let existing = get_transaction(id, &tx)?;
    let updated = existing.fields().merge(patch).validate()?;

    let transaction = tx
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET user_id = ?1, name = ?2, amount = ?3, kind = ?4, description = ?5
             WHERE id = ?6
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                updated.user_id,
                updated.name,
                updated.amount,
                updated.kind,
                updated.description,
                id,
            ),
            map_transaction_row,
        )?;

    tx.commit()?;

    Ok(transaction)
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Duration, macros::datetime};

    use crate::{
        Error,
        db::initialize,
        transaction::{
            TransactionFields, TransactionId, TransactionType, ValidationError,
            db::{
                count_transactions, create_transaction, delete_transaction, get_transaction,
                get_transactions_by_user, update_transaction,
            },
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn rent() -> TransactionFields {
        TransactionFields::new("u1", "Rent", 1200.0, TransactionType::Expense)
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let transaction =
            create_transaction(rent().description("March").validate().unwrap(), &conn)
                .expect("Could not create transaction");

        assert_eq!(transaction.user_id, "u1");
        assert_eq!(transaction.name, "Rent");
        assert_eq!(transaction.amount, 1200.0);
        assert_eq!(transaction.kind, TransactionType::Expense);
        assert_eq!(transaction.description.as_deref(), Some("March"));
    }

    #[test]
    fn create_assigns_unique_ids() {
        let conn = get_test_connection();

        let first = create_transaction(rent().validate().unwrap(), &conn).unwrap();
        let second = create_transaction(rent().validate().unwrap(), &conn).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(count_transactions(&conn), Ok(2));
    }

    #[test]
    fn created_transaction_is_listed_once_with_identical_fields() {
        let conn = get_test_connection();
        let created = create_transaction(rent().validate().unwrap(), &conn).unwrap();

        let listed = get_transactions_by_user("u1", &conn).unwrap();

        assert_eq!(listed, vec![created]);
    }

    #[test]
    fn get_fails_on_unknown_id() {
        let conn = get_test_connection();

        assert_eq!(
            get_transaction(TransactionId::new(), &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn list_is_empty_for_unknown_user() {
        let conn = get_test_connection();
        create_transaction(rent().validate().unwrap(), &conn).unwrap();

        assert_eq!(get_transactions_by_user("nobody", &conn), Ok(vec![]));
    }

    #[test]
    fn list_only_includes_the_users_transactions() {
        let conn = get_test_connection();
        let mine = create_transaction(rent().validate().unwrap(), &conn).unwrap();
        create_transaction(
            TransactionFields::new("u2", "Salary", 5000.0, TransactionType::Income)
                .validate()
                .unwrap(),
            &conn,
        )
        .unwrap();

        assert_eq!(get_transactions_by_user("u1", &conn), Ok(vec![mine]));
    }

    #[test]
    fn list_is_sorted_newest_first_for_any_insertion_order() {
        let conn = get_test_connection();
        let base = datetime!(2025-03-01 12:00:00 UTC);
        let offsets_in_days = [3, 0, 5, 1, 4, 2];

        for days in offsets_in_days {
            create_transaction(
                rent()
                    .validate()
                    .unwrap()
                    .created_at(base + Duration::days(days)),
                &conn,
            )
            .unwrap();
        }

        let listed = get_transactions_by_user("u1", &conn).unwrap();

        let got: Vec<_> = listed.iter().map(|t| t.created_at).collect();
        let want: Vec<_> = [5, 4, 3, 2, 1, 0]
            .into_iter()
            .map(|days| base + Duration::days(days))
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn list_breaks_timestamp_ties_by_newest_insert() {
        let conn = get_test_connection();
        let created_at = datetime!(2025-03-01 12:00:00 UTC);
        let first = create_transaction(rent().validate().unwrap().created_at(created_at), &conn)
            .unwrap();
        let second = create_transaction(rent().validate().unwrap().created_at(created_at), &conn)
            .unwrap();

        let listed = get_transactions_by_user("u1", &conn).unwrap();

        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn update_changes_only_patched_fields() {
        let conn = get_test_connection();
        let created = create_transaction(rent().validate().unwrap(), &conn).unwrap();

        let updated = update_transaction(
            created.id,
            TransactionFields {
                amount: Some(1300.0),
                description: Some("Rent increase".to_owned()),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.amount, 1300.0);
        assert_eq!(updated.description.as_deref(), Some("Rent increase"));
        assert_eq!(get_transaction(created.id, &conn), Ok(updated));
    }

    #[test]
    fn update_fails_on_unknown_id_without_writing() {
        let conn = get_test_connection();
        let created = create_transaction(rent().validate().unwrap(), &conn).unwrap();

        let result = update_transaction(
            TransactionId::new(),
            TransactionFields {
                name: Some("Groceries".to_owned()),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(get_transactions_by_user("u1", &conn), Ok(vec![created]));
    }

    #[test]
    fn update_revalidates_merged_record() {
        let conn = get_test_connection();
        let created = create_transaction(rent().validate().unwrap(), &conn).unwrap();

        let result = update_transaction(
            created.id,
            TransactionFields {
                amount: Some(-1.0),
                ..Default::default()
            },
            &conn,
        );

        match result {
            Err(Error::Validation(errors)) => {
                assert!(errors.contains(ValidationError::NegativeAmount))
            }
            other => panic!("Expected a validation error, got {other:?}"),
        }
        assert_eq!(get_transaction(created.id, &conn), Ok(created));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let created = create_transaction(rent().validate().unwrap(), &conn).unwrap();

        delete_transaction(created.id, &conn).unwrap();

        assert_eq!(get_transaction(created.id, &conn), Err(Error::NotFound));
        assert_eq!(get_transactions_by_user("u1", &conn), Ok(vec![]));
    }

    #[test]
    fn delete_twice_fails_the_second_time() {
        let conn = get_test_connection();
        let created = create_transaction(rent().validate().unwrap(), &conn).unwrap();

        assert_eq!(delete_transaction(created.id, &conn), Ok(()));
        assert_eq!(delete_transaction(created.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn table_rejects_negative_amounts() {
        let conn = get_test_connection();

        let result = conn.execute(
            "INSERT INTO \"transaction\" (id, user_id, name, amount, kind, created_at)
             VALUES ('x', 'u1', 'Rent', -1.0, 'expense', 0)",
            (),
        );

        assert!(result.is_err());
    }
}
