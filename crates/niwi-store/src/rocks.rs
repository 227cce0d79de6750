//! `RocksDB` storage implementation.
//!
//! Values are CBOR-encoded. Compound operations (credit grants, lead
//! unlocks, payment completion) write through a single `WriteBatch` so a
//! crash can never leave a balance without its transaction record.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use niwi_core::{
    BusinessProfile, ChatMessage, CreditAccount, CreditTransaction, CustomerRequest, Lead, LeadId,
    LeadStatus, PaymentSession, PaymentSessionStatus, RequestId, TransactionId, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{
    LeadFilter, LeadUnlock, PaymentCompletion, PlatformStats, ProfileFilter, RequestFilter, Store,
};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Scan every value of a column family, deserializing as it goes.
    fn scan_all<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();

        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            values.push(Self::deserialize(&value)?);
        }

        Ok(values)
    }

    /// Collect all index keys under a prefix.
    fn prefix_keys(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, rocksdb::Direction::Forward));

        let mut matched = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            matched.push(key.to_vec());
        }

        Ok(matched)
    }

    fn count_cf(&self, cf_name: &str) -> Result<u64> {
        let cf = self.cf(cf_name)?;
        let mut count = 0u64;
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            item.map_err(|e| StoreError::Database(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn put_account(&self, account: &CreditAccount) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(&account.user_id);
        let value = Self::serialize(account)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_account(&self, user_id: &UserId) -> Result<Option<CreditAccount>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn add_credits(
        &self,
        user_id: &UserId,
        amount: i64,
        transaction: &CreditTransaction,
    ) -> Result<i64> {
        let mut account = self
            .get_account(user_id)?
            .unwrap_or_else(|| CreditAccount::new(*user_id));

        account.balance += amount;
        if amount > 0 {
            account.total_purchased += amount;
        }
        account.updated_at = chrono::Utc::now();

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_tx_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let account_key = keys::account_key(user_id);
        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(user_id, &transaction.id);

        let account_value = Self::serialize(&account)?;
        let tx_value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, &account_key, &account_value);
        batch.put_cf(&cf_tx, &tx_key, &tx_value);
        batch.put_cf(&cf_tx_by_user, &user_tx_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(account.balance)
    }

    fn unlock_lead(
        &self,
        user_id: &UserId,
        lead_id: &LeadId,
        transaction: &CreditTransaction,
    ) -> Result<LeadUnlock> {
        let mut account = self
            .get_account(user_id)?
            .ok_or_else(|| StoreError::not_found("Account", user_id.to_string()))?;

        // Already paid for: the unlock is free.
        if self.is_lead_unlocked(user_id, lead_id)? {
            return Ok(LeadUnlock {
                balance: account.balance,
                newly_unlocked: false,
            });
        }

        let cost = transaction.amount.abs();
        if account.balance < cost {
            return Err(StoreError::InsufficientCredits {
                balance: account.balance,
                required: cost,
            });
        }

        account.balance -= cost;
        account.total_used += cost;
        account.updated_at = chrono::Utc::now();

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_tx_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;
        let cf_unlocks = self.cf(cf::LEAD_UNLOCKS)?;

        let account_key = keys::account_key(user_id);
        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(user_id, &transaction.id);
        let unlock_key = keys::lead_unlock_key(user_id, lead_id);

        let account_value = Self::serialize(&account)?;
        let tx_value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, &account_key, &account_value);
        batch.put_cf(&cf_tx, &tx_key, &tx_value);
        batch.put_cf(&cf_tx_by_user, &user_tx_key, []);
        batch.put_cf(&cf_unlocks, &unlock_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(LeadUnlock {
            balance: account.balance,
            newly_unlocked: true,
        })
    }

    fn is_lead_unlocked(&self, user_id: &UserId, lead_id: &LeadId) -> Result<bool> {
        let cf = self.cf(cf::LEAD_UNLOCKS)?;
        let key = keys::lead_unlock_key(user_id, lead_id);

        let exists = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        Ok(exists)
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    fn put_transaction(&self, transaction: &CreditTransaction) -> Result<()> {
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(&transaction.user_id, &transaction.id);
        let value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_tx, &tx_key, &value);
        batch.put_cf(&cf_by_user, &user_tx_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<CreditTransaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;
        let key = keys::transaction_key(transaction_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CreditTransaction>> {
        let prefix = keys::user_transactions_prefix(user_id);
        let mut all_keys = self.prefix_keys(cf::TRANSACTIONS_BY_USER, &prefix)?;

        // ULIDs are time-ordered; reverse for newest first.
        all_keys.reverse();

        let mut transactions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if transactions.len() >= limit {
                break;
            }

            let tx_id = keys::extract_transaction_id(&key);
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }

    // =========================================================================
    // Payment Session Operations
    // =========================================================================

    fn put_payment_session(&self, session: &PaymentSession) -> Result<()> {
        let cf = self.cf(cf::PAYMENT_SESSIONS)?;
        let key = keys::payment_session_key(&session.session_id);
        let value = Self::serialize(session)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_payment_session(&self, session_id: &str) -> Result<Option<PaymentSession>> {
        let cf = self.cf(cf::PAYMENT_SESSIONS)?;
        let key = keys::payment_session_key(session_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn complete_payment_session(&self, session_id: &str) -> Result<PaymentCompletion> {
        let mut session = self
            .get_payment_session(session_id)?
            .ok_or_else(|| StoreError::not_found("Payment session", session_id))?;

        if session.status == PaymentSessionStatus::Completed {
            let balance = self
                .get_account(&session.user_id)?
                .map_or(0, |a| a.balance);
            return Ok(PaymentCompletion {
                credits_added: session.credits_purchased,
                new_balance: balance,
                newly_completed: false,
            });
        }

        let mut account = self
            .get_account(&session.user_id)?
            .unwrap_or_else(|| CreditAccount::new(session.user_id));

        account.balance += session.credits_purchased;
        account.total_purchased += session.credits_purchased;
        account.updated_at = chrono::Utc::now();

        session.status = PaymentSessionStatus::Completed;
        session.updated_at = chrono::Utc::now();

        let transaction = CreditTransaction::purchase(
            session.user_id,
            session.credits_purchased,
            account.balance,
            format!("Credit purchase - {}", session.package),
            session.session_id.clone(),
        );

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_sessions = self.cf(cf::PAYMENT_SESSIONS)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_tx_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let account_key = keys::account_key(&session.user_id);
        let session_key = keys::payment_session_key(session_id);
        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(&session.user_id, &transaction.id);

        let account_value = Self::serialize(&account)?;
        let session_value = Self::serialize(&session)?;
        let tx_value = Self::serialize(&transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, &account_key, &account_value);
        batch.put_cf(&cf_sessions, &session_key, &session_value);
        batch.put_cf(&cf_tx, &tx_key, &tx_value);
        batch.put_cf(&cf_tx_by_user, &user_tx_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(PaymentCompletion {
            credits_added: session.credits_purchased,
            new_balance: account.balance,
            newly_completed: true,
        })
    }

    // =========================================================================
    // Customer Request Operations
    // =========================================================================

    fn put_request(&self, request: &CustomerRequest) -> Result<()> {
        let cf = self.cf(cf::REQUESTS)?;
        let key = keys::request_key(&request.id);
        let value = Self::serialize(request)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_request(&self, request_id: &RequestId) -> Result<Option<CustomerRequest>> {
        let cf = self.cf(cf::REQUESTS)?;
        let key = keys::request_key(request_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_request(&self, request_id: &RequestId) -> Result<()> {
        if self.get_request(request_id)?.is_none() {
            return Err(StoreError::not_found("Request", request_id.to_string()));
        }

        let cf = self.cf(cf::REQUESTS)?;
        self.db
            .delete_cf(&cf, keys::request_key(request_id))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_requests_by_customer(
        &self,
        customer_id: &str,
        limit: usize,
    ) -> Result<Vec<CustomerRequest>> {
        let mut requests: Vec<CustomerRequest> = self
            .scan_all::<CustomerRequest>(cf::REQUESTS)?
            .into_iter()
            .filter(|r| r.customer_id == customer_id)
            .collect();

        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests.truncate(limit);
        Ok(requests)
    }

    fn list_requests(&self, filter: &RequestFilter, limit: usize) -> Result<Vec<CustomerRequest>> {
        let mut requests: Vec<CustomerRequest> = self
            .scan_all::<CustomerRequest>(cf::REQUESTS)?
            .into_iter()
            .filter(|r| filter.status.is_none_or_eq(r.status))
            .filter(|r| filter.service_category.is_none_or_eq(r.service_category))
            .filter(|r| filter.urgency.is_none_or_eq(r.urgency))
            .collect();

        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests.truncate(limit);
        Ok(requests)
    }

    // =========================================================================
    // Lead Operations
    // =========================================================================

    fn put_lead(&self, lead: &Lead) -> Result<()> {
        let cf_leads = self.cf(cf::LEADS)?;
        let cf_index = self.cf(cf::LEADS_BY_PROFESSIONAL)?;

        let lead_key = keys::lead_key(&lead.id);
        let index_key = keys::professional_lead_key(&lead.professional_id, &lead.id);
        let value = Self::serialize(lead)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_leads, &lead_key, &value);
        batch.put_cf(&cf_index, &index_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_lead(&self, lead_id: &LeadId) -> Result<Option<Lead>> {
        let cf = self.cf(cf::LEADS)?;
        let key = keys::lead_key(lead_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_lead(&self, lead_id: &LeadId) -> Result<()> {
        let lead = self
            .get_lead(lead_id)?
            .ok_or_else(|| StoreError::not_found("Lead", lead_id.to_string()))?;

        let cf_leads = self.cf(cf::LEADS)?;
        let cf_index = self.cf(cf::LEADS_BY_PROFESSIONAL)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_leads, keys::lead_key(lead_id));
        batch.delete_cf(
            &cf_index,
            keys::professional_lead_key(&lead.professional_id, lead_id),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_leads_by_professional(
        &self,
        professional_id: &UserId,
        status: Option<LeadStatus>,
    ) -> Result<Vec<Lead>> {
        let prefix = keys::professional_leads_prefix(professional_id);
        let index_keys = self.prefix_keys(cf::LEADS_BY_PROFESSIONAL, &prefix)?;

        let mut leads = Vec::new();
        for key in index_keys {
            let lead_id = keys::extract_lead_id(&key);
            if let Some(lead) = self.get_lead(&lead_id)? {
                if status.is_none() || status == Some(lead.status) {
                    leads.push(lead);
                }
            }
        }

        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    fn list_leads(&self, filter: &LeadFilter, limit: usize) -> Result<Vec<Lead>> {
        let mut leads: Vec<Lead> = self
            .scan_all::<Lead>(cf::LEADS)?
            .into_iter()
            .filter(|l| filter.status.is_none_or_eq(l.status))
            .filter(|l| filter.professional_id.is_none_or_eq(l.professional_id))
            .collect();

        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        leads.truncate(limit);
        Ok(leads)
    }

    fn find_lead_for_request(
        &self,
        request_id: &RequestId,
        professional_id: &UserId,
    ) -> Result<Option<Lead>> {
        let leads = self.list_leads_by_professional(professional_id, None)?;
        Ok(leads
            .into_iter()
            .find(|l| l.customer_request_id == *request_id))
    }

    fn count_leads_for_request(&self, request_id: &RequestId) -> Result<usize> {
        let count = self
            .scan_all::<Lead>(cf::LEADS)?
            .into_iter()
            .filter(|l| l.customer_request_id == *request_id)
            .count();
        Ok(count)
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    fn put_profile(&self, profile: &BusinessProfile) -> Result<()> {
        let cf = self.cf(cf::PROFILES)?;
        let key = keys::profile_key(&profile.user_id);
        let value = Self::serialize(profile)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_profile(&self, user_id: &UserId) -> Result<Option<BusinessProfile>> {
        let cf = self.cf(cf::PROFILES)?;
        let key = keys::profile_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn search_profiles(
        &self,
        filter: &ProfileFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<BusinessProfile>> {
        let mut profiles: Vec<BusinessProfile> = self
            .scan_all::<BusinessProfile>(cf::PROFILES)?
            .into_iter()
            .filter(|p| {
                filter
                    .service_category
                    .map_or(true, |category| p.offers(category))
            })
            .filter(|p| {
                filter.city.as_deref().map_or(true, |city| {
                    p.city.to_lowercase().contains(&city.to_lowercase())
                })
            })
            .filter(|p| {
                filter.province.as_deref().map_or(true, |province| {
                    p.province.to_lowercase().contains(&province.to_lowercase())
                })
            })
            .filter(|p| filter.is_verified.is_none_or_eq(p.is_verified))
            .collect();

        // Featured first, then rating descending.
        profiles.sort_by(|a, b| {
            b.is_featured
                .cmp(&a.is_featured)
                .then(b.rating.total_cmp(&a.rating))
        });

        Ok(profiles.into_iter().skip(offset).take(limit).collect())
    }

    // =========================================================================
    // Chat Operations
    // =========================================================================

    fn put_chat_message(&self, message: &ChatMessage) -> Result<()> {
        let cf = self.cf(cf::CHAT_MESSAGES)?;
        let ulid = ulid::Ulid::new().to_bytes();
        let key = keys::chat_message_key(&message.session_id, &ulid);
        let value = Self::serialize(message)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_chat_messages(&self, session_id: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        let cf = self.cf(cf::CHAT_MESSAGES)?;
        let prefix = keys::chat_session_prefix(session_id);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, rocksdb::Direction::Forward));

        let mut messages = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            messages.push(Self::deserialize::<ChatMessage>(&value)?);
        }

        // Keep the most recent window but preserve send order.
        if messages.len() > limit {
            messages.drain(..messages.len() - limit);
        }

        Ok(messages)
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    fn platform_stats(&self) -> Result<PlatformStats> {
        let requests = self.scan_all::<CustomerRequest>(cf::REQUESTS)?;
        let leads = self.scan_all::<Lead>(cf::LEADS)?;
        let profiles = self.scan_all::<BusinessProfile>(cf::PROFILES)?;

        let pending_requests = requests
            .iter()
            .filter(|r| r.status == LeadStatus::Pending)
            .count() as u64;

        let active_leads = leads
            .iter()
            .filter(|l| {
                matches!(
                    l.status,
                    LeadStatus::Assigned | LeadStatus::Contacted | LeadStatus::InProgress
                )
            })
            .count() as u64;

        let verified_profiles = profiles.iter().filter(|p| p.is_verified).count() as u64;

        Ok(PlatformStats {
            total_requests: requests.len() as u64,
            pending_requests,
            total_leads: leads.len() as u64,
            active_leads,
            total_profiles: profiles.len() as u64,
            verified_profiles,
            total_accounts: self.count_cf(cf::ACCOUNTS)?,
        })
    }
}

/// Filter helper: `None` matches everything.
trait OptionMatch<T> {
    fn is_none_or_eq(&self, value: T) -> bool;
}

impl<T: PartialEq + Copy> OptionMatch<T> for Option<T> {
    fn is_none_or_eq(&self, value: T) -> bool {
        self.map_or(true, |wanted| wanted == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niwi_core::{CreditPackage, LeadPriority, ServiceCategory};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn sample_request(customer_id: &str) -> CustomerRequest {
        let now = chrono::Utc::now();
        CustomerRequest {
            id: RequestId::generate(),
            customer_id: customer_id.to_string(),
            service_category: ServiceCategory::Plumber,
            title: "Leaking tap".into(),
            description: "Drips constantly".into(),
            location: "Toronto, ON".into(),
            city: "Toronto".into(),
            province: "ON".into(),
            budget_min: None,
            budget_max: None,
            timeline: "ASAP".into(),
            urgency: LeadPriority::High,
            contact_preference: "either".into(),
            property_type: None,
            square_footage: None,
            additional_details: serde_json::Value::Null,
            status: LeadStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn account_crud() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let mut account = CreditAccount::new(user_id);
        account.balance = 25;

        store.put_account(&account).unwrap();

        let retrieved = store.get_account(&user_id).unwrap().unwrap();
        assert_eq!(retrieved.balance, 25);
    }

    #[test]
    fn add_credits_creates_account_and_transaction() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        let tx = CreditTransaction::adjustment(user_id, 10, 10, "Welcome bonus".into());
        let balance = store.add_credits(&user_id, 10, &tx).unwrap();
        assert_eq!(balance, 10);

        let account = store.get_account(&user_id).unwrap().unwrap();
        assert_eq!(account.balance, 10);
        assert_eq!(account.total_purchased, 10);

        let transactions = store.list_transactions_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "Welcome bonus");
    }

    #[test]
    fn transaction_listing_newest_first_with_pagination() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        let tx1 = CreditTransaction::adjustment(user_id, 5, 5, "First".into());
        store.put_transaction(&tx1).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2)); // Ensure different ULIDs

        let tx2 = CreditTransaction::adjustment(user_id, 5, 10, "Second".into());
        store.put_transaction(&tx2).unwrap();

        let all = store.list_transactions_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].description, "Second");
        assert_eq!(all[1].description, "First");

        let page2 = store.list_transactions_by_user(&user_id, 1, 1).unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].description, "First");
    }

    #[test]
    fn unlock_lead_deducts_once() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let lead_id = LeadId::generate();

        let mut account = CreditAccount::new(user_id);
        account.balance = 3;
        store.put_account(&account).unwrap();

        let tx = CreditTransaction::lead_unlock(user_id, 1, 2, lead_id);
        let outcome = store.unlock_lead(&user_id, &lead_id, &tx).unwrap();
        assert_eq!(outcome.balance, 2);
        assert!(outcome.newly_unlocked);
        assert!(store.is_lead_unlocked(&user_id, &lead_id).unwrap());

        // Second unlock of the same lead is free.
        let tx2 = CreditTransaction::lead_unlock(user_id, 1, 1, lead_id);
        let outcome = store.unlock_lead(&user_id, &lead_id, &tx2).unwrap();
        assert_eq!(outcome.balance, 2);
        assert!(!outcome.newly_unlocked);
    }

    #[test]
    fn unlock_lead_insufficient_credits() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let lead_id = LeadId::generate();

        store.put_account(&CreditAccount::new(user_id)).unwrap();

        let tx = CreditTransaction::lead_unlock(user_id, 1, 0, lead_id);
        let result = store.unlock_lead(&user_id, &lead_id, &tx);
        assert!(matches!(
            result,
            Err(StoreError::InsufficientCredits {
                balance: 0,
                required: 1
            })
        ));
    }

    #[test]
    fn complete_payment_session_grants_exactly_once() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        let session =
            PaymentSession::initiated("cs_test_1".into(), user_id, CreditPackage::Basic25);
        store.put_payment_session(&session).unwrap();

        let first = store.complete_payment_session("cs_test_1").unwrap();
        assert!(first.newly_completed);
        assert_eq!(first.credits_added, 25);
        assert_eq!(first.new_balance, 25);

        // Webhook and poller may race; the second completion is a no-op.
        let second = store.complete_payment_session("cs_test_1").unwrap();
        assert!(!second.newly_completed);
        assert_eq!(second.new_balance, 25);

        let account = store.get_account(&user_id).unwrap().unwrap();
        assert_eq!(account.balance, 25);
        assert_eq!(account.total_purchased, 25);

        let transactions = store.list_transactions_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(transactions.len(), 1);
    }

    #[test]
    fn complete_unknown_session_not_found() {
        let (store, _dir) = create_test_store();
        let result = store.complete_payment_session("cs_missing");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn request_crud_and_listing() {
        let (store, _dir) = create_test_store();

        let request = sample_request("customer-1");
        store.put_request(&request).unwrap();

        let retrieved = store.get_request(&request.id).unwrap().unwrap();
        assert_eq!(retrieved.title, "Leaking tap");

        let mine = store.list_requests_by_customer("customer-1", 10).unwrap();
        assert_eq!(mine.len(), 1);

        let filtered = store
            .list_requests(
                &RequestFilter {
                    status: Some(LeadStatus::Pending),
                    ..RequestFilter::default()
                },
                10,
            )
            .unwrap();
        assert_eq!(filtered.len(), 1);

        let none = store
            .list_requests(
                &RequestFilter {
                    urgency: Some(LeadPriority::Low),
                    ..RequestFilter::default()
                },
                10,
            )
            .unwrap();
        assert!(none.is_empty());

        store.delete_request(&request.id).unwrap();
        assert!(store.get_request(&request.id).unwrap().is_none());
    }

    #[test]
    fn lead_index_and_duplicate_guard() {
        let (store, _dir) = create_test_store();
        let professional_id = UserId::generate();
        let request = sample_request("customer-2");
        store.put_request(&request).unwrap();

        let lead = Lead::assign(request.id, professional_id);
        store.put_lead(&lead).unwrap();

        let mine = store
            .list_leads_by_professional(&professional_id, None)
            .unwrap();
        assert_eq!(mine.len(), 1);

        let existing = store
            .find_lead_for_request(&request.id, &professional_id)
            .unwrap();
        assert!(existing.is_some());

        assert_eq!(store.count_leads_for_request(&request.id).unwrap(), 1);

        store.delete_lead(&lead.id).unwrap();
        assert!(store.get_lead(&lead.id).unwrap().is_none());
        assert!(store
            .list_leads_by_professional(&professional_id, None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn profile_search_filters_and_ordering() {
        let (store, _dir) = create_test_store();
        let now = chrono::Utc::now();

        let mut base = BusinessProfile {
            user_id: UserId::generate(),
            business_name: "Acme Plumbing".into(),
            service_categories: vec![ServiceCategory::Plumber],
            description: "Pipes".into(),
            service_areas: vec!["Toronto".into()],
            years_experience: 5,
            license_number: None,
            insurance_verified: false,
            website: None,
            business_phone: None,
            address: None,
            city: "Toronto".into(),
            province: "ON".into(),
            postal_code: "M5V 2T6".into(),
            hourly_rate_min: None,
            hourly_rate_max: None,
            rating: 3.5,
            review_count: 4,
            is_featured: false,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        store.put_profile(&base).unwrap();

        base.user_id = UserId::generate();
        base.business_name = "Featured Roofing".into();
        base.service_categories = vec![ServiceCategory::Roofing];
        base.rating = 2.0;
        base.is_featured = true;
        base.is_verified = true;
        store.put_profile(&base).unwrap();

        let all = store
            .search_profiles(&ProfileFilter::default(), 10, 0)
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].business_name, "Featured Roofing"); // Featured first

        let plumbers = store
            .search_profiles(
                &ProfileFilter {
                    service_category: Some(ServiceCategory::Plumber),
                    ..ProfileFilter::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(plumbers.len(), 1);

        let toronto = store
            .search_profiles(
                &ProfileFilter {
                    city: Some("toronto".into()),
                    ..ProfileFilter::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(toronto.len(), 2);
    }

    #[test]
    fn chat_history_window() {
        let (store, _dir) = create_test_store();

        for i in 0..4 {
            let message = ChatMessage::new(
                "sess-1".into(),
                if i % 2 == 0 {
                    niwi_core::ChatRole::User
                } else {
                    niwi_core::ChatRole::Assistant
                },
                format!("message {i}"),
            );
            store.put_chat_message(&message).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let window = store.list_chat_messages("sess-1", 3).unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, "message 1"); // Oldest of the window
        assert_eq!(window[2].content, "message 3");

        assert!(store.list_chat_messages("sess-2", 10).unwrap().is_empty());
    }

    #[test]
    fn platform_stats_counts() {
        let (store, _dir) = create_test_store();

        let request = sample_request("customer-3");
        store.put_request(&request).unwrap();

        let professional_id = UserId::generate();
        let lead = Lead::assign(request.id, professional_id);
        store.put_lead(&lead).unwrap();

        store
            .put_account(&CreditAccount::new(professional_id))
            .unwrap();

        let stats = store.platform_stats().unwrap();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.pending_requests, 1);
        assert_eq!(stats.total_leads, 1);
        assert_eq!(stats.active_leads, 1);
        assert_eq!(stats.total_accounts, 1);
    }
}
