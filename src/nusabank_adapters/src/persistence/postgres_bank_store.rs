use chrono::{DateTime, NaiveDate, Utc};
use nusabank_core::{
    Account, AccountNumber, AccountStatus, AccountStore, Card, CardNumber, CardStatus, CardStore,
    CardType, EmailAddress, EntityStoreError, KycStatus, PhoneNumber, ProvisioningStore, User,
    UserStatus, UserStore,
};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

/// Postgres-backed entity store.
///
/// Implements all four storage ports over one connection pool; the unique
/// indexes on email, phone number, account number and card number are the
/// final authority on uniqueness and surface as [`EntityStoreError::Conflict`].
pub struct PostgresBankStore {
    pool: sqlx::PgPool,
}

impl PostgresBankStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresBankStore { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresBankStore {
    #[tracing::instrument(name = "Checking email existence in PostgreSQL", skip_all)]
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, EntityStoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.try_get(0).map_err(map_sqlx_error)
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, EntityStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, full_name, email, phone_number, password_hash,
                       kyc_status, status, created_at
                FROM users
                WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| row_to_user(&row)).transpose()
    }
}

#[async_trait::async_trait]
impl AccountStore for PostgresBankStore {
    #[tracing::instrument(name = "Checking account number existence in PostgreSQL", skip_all)]
    async fn account_number_exists(
        &self,
        number: &AccountNumber,
    ) -> Result<bool, EntityStoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM accounts WHERE account_number = $1)")
            .bind(number.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.try_get(0).map_err(map_sqlx_error)
    }

    #[tracing::instrument(name = "Retrieving account from PostgreSQL", skip_all)]
    async fn find_by_account_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, EntityStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, account_number, user_id, balance, currency,
                       status, version, created_at, updated_at
                FROM accounts
                WHERE account_number = $1
            "#,
        )
        .bind(number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| row_to_account(&row)).transpose()
    }

    #[tracing::instrument(name = "Retrieving account by owner from PostgreSQL", skip_all)]
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<Account>, EntityStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, account_number, user_id, balance, currency,
                       status, version, created_at, updated_at
                FROM accounts
                WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| row_to_account(&row)).transpose()
    }

    #[tracing::instrument(name = "Updating account status in PostgreSQL", skip_all)]
    async fn set_status(
        &self,
        account_id: Uuid,
        status: AccountStatus,
    ) -> Result<(), EntityStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET status = $1, version = version + 1, updated_at = now()
                WHERE id = $2
            "#,
        )
        .bind(account_status_str(status))
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(EntityStoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CardStore for PostgresBankStore {
    #[tracing::instrument(name = "Checking card number existence in PostgreSQL", skip_all)]
    async fn card_number_exists(&self, number: &CardNumber) -> Result<bool, EntityStoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM cards WHERE card_number = $1)")
            .bind(number.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.try_get(0).map_err(map_sqlx_error)
    }

    #[tracing::instrument(name = "Retrieving card from PostgreSQL", skip_all)]
    async fn find_by_account(&self, account_id: Uuid) -> Result<Option<Card>, EntityStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, account_id, card_number, card_type, status,
                       expiry_date, pin_hash, created_at
                FROM cards
                WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| row_to_card(&row)).transpose()
    }

    #[tracing::instrument(name = "Inserting card into PostgreSQL", skip_all)]
    async fn save_card(&self, card: &Card) -> Result<(), EntityStoreError> {
        insert_card(card, &self.pool).await
    }

    #[tracing::instrument(name = "Storing PIN hash in PostgreSQL", skip_all)]
    async fn set_pin_hash(&self, card_id: Uuid, pin_hash: &str) -> Result<(), EntityStoreError> {
        let result = sqlx::query("UPDATE cards SET pin_hash = $1 WHERE id = $2")
            .bind(pin_hash)
            .bind(card_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(EntityStoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProvisioningStore for PostgresBankStore {
    #[tracing::instrument(name = "Provisioning customer in PostgreSQL", skip_all)]
    async fn persist_customer(
        &self,
        user: &User,
        account: &Account,
        card: &Card,
    ) -> Result<(), EntityStoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
                INSERT INTO users (id, full_name, email, phone_number, password_hash,
                                   kyc_status, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(user.email.as_str())
        .bind(user.phone_number.as_str())
        .bind(&user.password_hash)
        .bind(kyc_status_str(user.kyc_status))
        .bind(user_status_str(user.status))
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
                INSERT INTO accounts (id, account_number, user_id, balance, currency,
                                      status, version, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.id)
        .bind(account.account_number.as_str())
        .bind(account.owner_user_id)
        .bind(account.balance)
        .bind(&account.currency)
        .bind(account_status_str(account.status))
        .bind(account.version)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
                INSERT INTO cards (id, account_id, card_number, card_type, status,
                                   expiry_date, pin_hash, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(card.id)
        .bind(card.account_id)
        .bind(card.card_number.as_str())
        .bind(card_type_str(card.card_type))
        .bind(card_status_str(card.status))
        .bind(card.expiry_date)
        .bind(card.pin_hash.as_deref())
        .bind(card.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)
    }
}

async fn insert_card(card: &Card, pool: &sqlx::PgPool) -> Result<(), EntityStoreError> {
    sqlx::query(
        r#"
            INSERT INTO cards (id, account_id, card_number, card_type, status,
                               expiry_date, pin_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(card.id)
    .bind(card.account_id)
    .bind(card.card_number.as_str())
    .bind(card_type_str(card.card_type))
    .bind(card_status_str(card.status))
    .bind(card.expiry_date)
    .bind(card.pin_hash.as_deref())
    .bind(card.created_at)
    .execute(pool)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

fn map_sqlx_error(e: sqlx::Error) -> EntityStoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.constraint().is_some() {
            return EntityStoreError::Conflict;
        }
    }
    EntityStoreError::UnexpectedError(e.to_string())
}

fn row_to_user(row: &PgRow) -> Result<User, EntityStoreError> {
    Ok(User {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        full_name: row.try_get("full_name").map_err(map_sqlx_error)?,
        email: EmailAddress::parse(row.try_get::<String, _>("email").map_err(map_sqlx_error)?)
            .map_err(|e| EntityStoreError::UnexpectedError(e.to_string()))?,
        phone_number: PhoneNumber::parse(
            row.try_get::<String, _>("phone_number")
                .map_err(map_sqlx_error)?,
        )
        .map_err(|e| EntityStoreError::UnexpectedError(e.to_string()))?,
        password_hash: row.try_get("password_hash").map_err(map_sqlx_error)?,
        kyc_status: parse_kyc_status(
            &row.try_get::<String, _>("kyc_status")
                .map_err(map_sqlx_error)?,
        )?,
        status: parse_user_status(
            &row.try_get::<String, _>("status").map_err(map_sqlx_error)?,
        )?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(map_sqlx_error)?,
    })
}

fn row_to_account(row: &PgRow) -> Result<Account, EntityStoreError> {
    Ok(Account {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        account_number: AccountNumber::parse(
            row.try_get::<String, _>("account_number")
                .map_err(map_sqlx_error)?,
        )
        .map_err(|e| EntityStoreError::UnexpectedError(e.to_string()))?,
        owner_user_id: row.try_get("user_id").map_err(map_sqlx_error)?,
        balance: row.try_get::<Decimal, _>("balance").map_err(map_sqlx_error)?,
        currency: row.try_get("currency").map_err(map_sqlx_error)?,
        status: parse_account_status(
            &row.try_get::<String, _>("status").map_err(map_sqlx_error)?,
        )?,
        version: row.try_get("version").map_err(map_sqlx_error)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(map_sqlx_error)?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(map_sqlx_error)?,
    })
}

fn row_to_card(row: &PgRow) -> Result<Card, EntityStoreError> {
    Ok(Card {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        account_id: row.try_get("account_id").map_err(map_sqlx_error)?,
        card_number: CardNumber::parse(
            row.try_get::<String, _>("card_number")
                .map_err(map_sqlx_error)?,
        )
        .map_err(|e| EntityStoreError::UnexpectedError(e.to_string()))?,
        card_type: parse_card_type(
            &row.try_get::<String, _>("card_type").map_err(map_sqlx_error)?,
        )?,
        status: parse_card_status(
            &row.try_get::<String, _>("status").map_err(map_sqlx_error)?,
        )?,
        expiry_date: row
            .try_get::<NaiveDate, _>("expiry_date")
            .map_err(map_sqlx_error)?,
        pin_hash: row
            .try_get::<Option<String>, _>("pin_hash")
            .map_err(map_sqlx_error)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(map_sqlx_error)?,
    })
}

fn account_status_str(status: AccountStatus) -> &'static str {
    match status {
        AccountStatus::Active => "ACTIVE",
        AccountStatus::Inactive => "INACTIVE",
        AccountStatus::Blocked => "BLOCKED",
    }
}

fn parse_account_status(value: &str) -> Result<AccountStatus, EntityStoreError> {
    match value {
        "ACTIVE" => Ok(AccountStatus::Active),
        "INACTIVE" => Ok(AccountStatus::Inactive),
        "BLOCKED" => Ok(AccountStatus::Blocked),
        other => Err(EntityStoreError::UnexpectedError(format!(
            "unknown account status: {other}"
        ))),
    }
}

fn user_status_str(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => "ACTIVE",
        UserStatus::Suspended => "SUSPENDED",
        UserStatus::Closed => "CLOSED",
    }
}

fn parse_user_status(value: &str) -> Result<UserStatus, EntityStoreError> {
    match value {
        "ACTIVE" => Ok(UserStatus::Active),
        "SUSPENDED" => Ok(UserStatus::Suspended),
        "CLOSED" => Ok(UserStatus::Closed),
        other => Err(EntityStoreError::UnexpectedError(format!(
            "unknown user status: {other}"
        ))),
    }
}

fn kyc_status_str(status: KycStatus) -> &'static str {
    match status {
        KycStatus::Pending => "PENDING",
        KycStatus::Verified => "VERIFIED",
        KycStatus::Rejected => "REJECTED",
    }
}

fn parse_kyc_status(value: &str) -> Result<KycStatus, EntityStoreError> {
    match value {
        "PENDING" => Ok(KycStatus::Pending),
        "VERIFIED" => Ok(KycStatus::Verified),
        "REJECTED" => Ok(KycStatus::Rejected),
        other => Err(EntityStoreError::UnexpectedError(format!(
            "unknown KYC status: {other}"
        ))),
    }
}

fn card_type_str(card_type: CardType) -> &'static str {
    match card_type {
        CardType::Debit => "DEBIT",
        CardType::Credit => "CREDIT",
    }
}

fn parse_card_type(value: &str) -> Result<CardType, EntityStoreError> {
    match value {
        "DEBIT" => Ok(CardType::Debit),
        "CREDIT" => Ok(CardType::Credit),
        other => Err(EntityStoreError::UnexpectedError(format!(
            "unknown card type: {other}"
        ))),
    }
}

fn card_status_str(status: CardStatus) -> &'static str {
    match status {
        CardStatus::Inactive => "INACTIVE",
        CardStatus::Active => "ACTIVE",
        CardStatus::Blocked => "BLOCKED",
    }
}

fn parse_card_status(value: &str) -> Result<CardStatus, EntityStoreError> {
    match value {
        "INACTIVE" => Ok(CardStatus::Inactive),
        "ACTIVE" => Ok(CardStatus::Active),
        "BLOCKED" => Ok(CardStatus::Blocked),
        other => Err(EntityStoreError::UnexpectedError(format!(
            "unknown card status: {other}"
        ))),
    }
}
