//! The operation orchestrator.
//!
//! Lifecycle of every state-changing call:
//!
//! ```text
//! execute(&self, ctx, op)  -> validate, read, compute, buffer writes
//!                          -> PreparedOperation (owns its CommitUnit)
//! commit(&mut self, prep)  -> store validates read-set
//!                          -> Committed { receipt, output, events }
//!                           | Aborted(conflict)
//! ```
//!
//! Write order inside a unit is fixed: balances, supply, audit entry, event.

use chrono::{DateTime, Utc};
use epc_state::{CommitOutcome, CommitUnit, StateTxn, TxContext, VersionedStore};
use epc_types::{
    AccountId, Balance, LedgerConfig, LedgerError, PriceId, PriceRecord, Result, Supply,
    Transaction, TxId, amount, constants,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    Operation, OperationOutput, PriceObservation, SupplyAudit, audit, balance_store,
    price_oracle, supply_ledger, tx_log,
};

/// An executed operation waiting to be committed.
///
/// Holds no borrow of the ledger, so several can be prepared against the
/// same snapshot and committed in any order.
#[derive(Debug, Clone)]
pub struct PreparedOperation {
    op: &'static str,
    unit: CommitUnit,
    output: OperationOutput,
}

impl PreparedOperation {
    pub fn name(&self) -> &'static str {
        self.op
    }

    pub fn unit(&self) -> &CommitUnit {
        &self.unit
    }

    pub fn output(&self) -> &OperationOutput {
        &self.output
    }
}

/// EPC token ledger over a versioned store.
pub struct TokenLedger<S: VersionedStore> {
    store: S,
    config: LedgerConfig,
}

impl<S: VersionedStore> TokenLedger<S> {
    /// # Errors
    /// Returns `InvalidConfig` if `config` does not validate.
    pub fn new(store: S, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            amount_scale = config.amount_scale,
            price_scale = config.price_scale,
            "token ledger ready"
        );
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // --- Execute / commit ---

    /// Run `op` against the current committed state without writing.
    ///
    /// Business-rule failures are returned here; nothing is buffered for a
    /// failed operation.
    pub fn execute(&self, ctx: TxContext, op: Operation) -> Result<PreparedOperation> {
        amount::ensure_identifier("transaction id", ctx.tx_id.as_str())?;
        let name = op.name();
        let mut txn = StateTxn::new(&self.store, ctx);

        let output = match op {
            Operation::InitLedger => {
                OperationOutput::Initialized(supply_ledger::initialize(&mut txn)?)
            }
            Operation::SetPrice(observation) => self.exec_set_price(&mut txn, observation)?,
            Operation::Mint {
                account,
                amount,
                reason,
                ref_id,
            } => self.exec_mint(&mut txn, account, amount, reason, ref_id)?,
            Operation::Burn {
                account,
                amount,
                reason,
                ref_id,
            } => self.exec_burn(&mut txn, account, amount, reason, ref_id)?,
            Operation::Transfer {
                from,
                to,
                amount,
                reason,
                ref_id,
            } => self.exec_transfer(&mut txn, from, to, amount, reason, ref_id)?,
            Operation::Lock {
                account,
                amount,
                ref_id,
            } => self.exec_lock(&mut txn, account, amount, ref_id)?,
            Operation::Unlock {
                account,
                amount,
                ref_id,
            } => self.exec_unlock(&mut txn, account, amount, ref_id)?,
        };

        Ok(PreparedOperation {
            op: name,
            unit: txn.into_commit_unit()?,
            output,
        })
    }

    /// Hand a prepared operation to the store.
    ///
    /// A stale read-set yields `Aborted`; the caller may re-execute.
    pub fn commit(
        &mut self,
        prepared: PreparedOperation,
    ) -> Result<CommitOutcome<OperationOutput>> {
        let PreparedOperation { op, unit, output } = prepared;
        let tx_id = unit.tx_id.clone();

        let outcome = self.store.commit(unit)?.with_output(output);
        match &outcome {
            CommitOutcome::Committed {
                receipt, events, ..
            } => info!(
                tx_id = %tx_id,
                op,
                version = %receipt.version,
                events = events.len(),
                digest = %receipt.digest_hex(),
                "operation committed"
            ),
            CommitOutcome::Aborted(conflict) => warn!(
                tx_id = %tx_id,
                op,
                %conflict,
                "operation aborted on stale read"
            ),
        }
        Ok(outcome)
    }

    /// `execute` then `commit`.
    pub fn submit(
        &mut self,
        ctx: TxContext,
        op: Operation,
    ) -> Result<CommitOutcome<OperationOutput>> {
        let prepared = self.execute(ctx, op)?;
        self.commit(prepared)
    }

    // --- Operations ---

    pub fn init_ledger(&mut self, ctx: TxContext) -> Result<CommitOutcome<OperationOutput>> {
        self.submit(ctx, Operation::InitLedger)
    }

    pub fn set_price(
        &mut self,
        ctx: TxContext,
        observation: PriceObservation,
    ) -> Result<CommitOutcome<OperationOutput>> {
        self.submit(ctx, Operation::SetPrice(observation))
    }

    pub fn mint(
        &mut self,
        ctx: TxContext,
        account: impl Into<AccountId>,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
    ) -> Result<CommitOutcome<OperationOutput>> {
        self.submit(ctx, Operation::mint(account, amount, reason, ref_id))
    }

    pub fn burn(
        &mut self,
        ctx: TxContext,
        account: impl Into<AccountId>,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
    ) -> Result<CommitOutcome<OperationOutput>> {
        self.submit(ctx, Operation::burn(account, amount, reason, ref_id))
    }

    pub fn transfer(
        &mut self,
        ctx: TxContext,
        from: impl Into<AccountId>,
        to: impl Into<AccountId>,
        amount: Decimal,
        reason: impl Into<String>,
        ref_id: impl Into<String>,
    ) -> Result<CommitOutcome<OperationOutput>> {
        self.submit(ctx, Operation::transfer(from, to, amount, reason, ref_id))
    }

    pub fn lock(
        &mut self,
        ctx: TxContext,
        account: impl Into<AccountId>,
        amount: Decimal,
        ref_id: impl Into<String>,
    ) -> Result<CommitOutcome<OperationOutput>> {
        self.submit(ctx, Operation::lock(account, amount, ref_id))
    }

    pub fn unlock(
        &mut self,
        ctx: TxContext,
        account: impl Into<AccountId>,
        amount: Decimal,
        ref_id: impl Into<String>,
    ) -> Result<CommitOutcome<OperationOutput>> {
        self.submit(ctx, Operation::unlock(account, amount, ref_id))
    }

    // --- Queries ---

    /// Balance of `account`; zero if never written.
    pub fn balance_of(&self, account: &AccountId) -> Result<Balance> {
        balance_store::get_or_create(&mut self.reader(), account)
    }

    /// Supply singleton; zero if never written.
    pub fn total_supply(&self) -> Result<Supply> {
        supply_ledger::read(&mut self.reader())
    }

    pub fn get_price(&self) -> Result<PriceRecord> {
        price_oracle::latest(&mut self.reader())
    }

    pub fn get_price_history(&self, price_id: &PriceId) -> Result<Vec<PriceRecord>> {
        price_oracle::history(&mut self.reader(), price_id)
    }

    pub fn get_transaction(&self, tx_id: &TxId) -> Result<Transaction> {
        tx_log::get(&mut self.reader(), tx_id)
    }

    pub fn audit_supply(&self) -> Result<SupplyAudit> {
        audit::audit(&mut self.reader())
    }

    fn reader(&self) -> StateTxn<'_, S> {
        StateTxn::read_only(&self.store)
    }

    // --- Execution bodies ---

    fn exec_set_price(
        &self,
        txn: &mut StateTxn<'_, S>,
        observation: PriceObservation,
    ) -> Result<OperationOutput> {
        let record = price_oracle::record(txn, observation, self.config.price_scale)?;
        supply_ledger::set_price(txn, record.basket_price)?;
        Ok(OperationOutput::Price(record))
    }

    fn exec_mint(
        &self,
        txn: &mut StateTxn<'_, S>,
        account: AccountId,
        amount: Decimal,
        reason: String,
        ref_id: String,
    ) -> Result<OperationOutput> {
        check_account(&account)?;
        self.check_amount(amount)?;

        balance_store::credit(txn, &account, amount)?;
        supply_ledger::mint(txn, amount)?;

        let (tx_id, now) = stamp(txn)?;
        let entry = Transaction::mint(tx_id, account, amount, reason, ref_id, now);
        record(txn, entry)
    }

    fn exec_burn(
        &self,
        txn: &mut StateTxn<'_, S>,
        account: AccountId,
        amount: Decimal,
        reason: String,
        ref_id: String,
    ) -> Result<OperationOutput> {
        check_account(&account)?;
        self.check_amount(amount)?;

        balance_store::debit(txn, &account, amount)?;
        supply_ledger::burn(txn, amount)?;

        let (tx_id, now) = stamp(txn)?;
        let entry = Transaction::burn(tx_id, account, amount, reason, ref_id, now);
        record(txn, entry)
    }

    fn exec_transfer(
        &self,
        txn: &mut StateTxn<'_, S>,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        reason: String,
        ref_id: String,
    ) -> Result<OperationOutput> {
        check_account(&from)?;
        check_account(&to)?;
        self.check_amount(amount)?;
        if from == to {
            return Err(LedgerError::SelfTransfer { account: from });
        }

        balance_store::debit(txn, &from, amount)?;
        balance_store::credit(txn, &to, amount)?;

        let (tx_id, now) = stamp(txn)?;
        let entry = Transaction::transfer(tx_id, from, to, amount, reason, ref_id, now);
        record(txn, entry)
    }

    fn exec_lock(
        &self,
        txn: &mut StateTxn<'_, S>,
        account: AccountId,
        amount: Decimal,
        ref_id: String,
    ) -> Result<OperationOutput> {
        check_account(&account)?;
        self.check_amount(amount)?;

        balance_store::lock(txn, &account, amount)?;

        let (tx_id, now) = stamp(txn)?;
        let entry = Transaction::lock(
            tx_id,
            account,
            amount,
            self.config.lock_reason.clone(),
            ref_id,
            now,
        );
        record(txn, entry)
    }

    fn exec_unlock(
        &self,
        txn: &mut StateTxn<'_, S>,
        account: AccountId,
        amount: Decimal,
        ref_id: String,
    ) -> Result<OperationOutput> {
        check_account(&account)?;
        self.check_amount(amount)?;

        balance_store::unlock(txn, &account, amount)?;

        let (tx_id, now) = stamp(txn)?;
        let entry = Transaction::unlock(
            tx_id,
            account,
            amount,
            self.config.unlock_reason.clone(),
            ref_id,
            now,
        );
        record(txn, entry)
    }

    fn check_amount(&self, value: Decimal) -> Result<()> {
        amount::ensure_amount(value, self.config.amount_scale)
    }
}

fn stamp<S: VersionedStore + ?Sized>(txn: &StateTxn<'_, S>) -> Result<(TxId, DateTime<Utc>)> {
    let ctx = txn.context()?;
    Ok((ctx.tx_id.clone(), ctx.timestamp))
}

fn record<S: VersionedStore + ?Sized>(
    txn: &mut StateTxn<'_, S>,
    entry: Transaction,
) -> Result<OperationOutput> {
    tx_log::append(txn, &entry)?;
    Ok(OperationOutput::Recorded(entry))
}

fn check_account(account: &AccountId) -> Result<()> {
    amount::ensure_identifier("account id", account.as_str())
}
