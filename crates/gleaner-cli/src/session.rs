//! Session state shared by the REPL and one-shot commands.
//!
//! One session holds the file list, the schema being edited, the last
//! result, the CRM account list and the submission status. Actions take
//! `&mut self`, so at most one extraction or send is in flight.

use crate::error::{CliError, Result};
use gleaner_crm::CrmClient;
use gleaner_domain::{
    Account, AggregatedResult, CrmStatus, FieldId, LlmProvider, Schema, SchemaTemplate,
};
use gleaner_extractor::{Extractor, SourceFile};
use std::fmt::Display;
use tracing::info;

/// Why a send cannot happen right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendBlocker {
    /// No webhook URL configured
    NoWebhook,
    /// Nothing extracted yet
    NoResult,
    /// Last extraction failed
    FailedResult,
    /// No account selected
    NoAccount,
    /// This result was already accepted
    AlreadySent,
}

impl Display for SendBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            SendBlocker::NoWebhook => "CRM webhook URL is not configured",
            SendBlocker::NoResult => "Nothing to send; run 'extract' first",
            SendBlocker::FailedResult => "Last extraction failed; nothing to send",
            SendBlocker::NoAccount => "No account selected; use 'select <account-id>'",
            SendBlocker::AlreadySent => "Result already sent; run 'extract' again to send new data",
        };
        f.write_str(msg)
    }
}

/// Interactive extraction session
pub struct Session<L: LlmProvider> {
    extractor: Extractor<L>,
    crm: Option<CrmClient>,
    templates: Vec<SchemaTemplate>,
    files: Vec<SourceFile>,
    schema: Schema,
    result: Option<AggregatedResult>,
    accounts: Vec<Account>,
    selected_account: Option<String>,
    crm_status: CrmStatus,
}

impl<L> Session<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create an empty session
    pub fn new(extractor: Extractor<L>, crm: Option<CrmClient>, templates: Vec<SchemaTemplate>) -> Self {
        Self {
            extractor,
            crm,
            templates,
            files: Vec::new(),
            schema: Schema::new(),
            result: None,
            accounts: Vec::new(),
            selected_account: None,
            crm_status: CrmStatus::Idle,
        }
    }

    /// The extractor backing this session
    pub fn extractor(&self) -> &Extractor<L> {
        &self.extractor
    }

    // ---- files ----

    /// Files queued for the next extraction, in upload order
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Append a file; unsupported media types are rejected
    pub fn add_file(&mut self, file: SourceFile) -> Result<()> {
        file.check_supported()?;
        info!("Added file '{}'", file.name);
        self.files.push(file);
        Ok(())
    }

    /// Remove the file at a 1-based position
    pub fn remove_file(&mut self, position: usize) -> Result<SourceFile> {
        if position == 0 || position > self.files.len() {
            return Err(CliError::InvalidInput(format!("No file #{}", position)));
        }
        Ok(self.files.remove(position - 1))
    }

    // ---- schema ----

    /// Schema being edited
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Mutable access for editor operations
    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    /// Replace the whole schema
    pub fn set_schema(&mut self, schema: Schema) {
        self.schema = schema;
    }

    /// Id of the field at a 1-based position
    pub fn field_id(&self, position: usize) -> Result<FieldId> {
        position
            .checked_sub(1)
            .and_then(|idx| self.schema.fields().get(idx))
            .map(|f| f.id)
            .ok_or_else(|| CliError::InvalidInput(format!("No field #{}", position)))
    }

    /// Templates available to `apply_template`
    pub fn templates(&self) -> &[SchemaTemplate] {
        &self.templates
    }

    /// Append a template's fields; returns how many were added
    pub fn apply_template(&mut self, id: &str) -> Result<usize> {
        let template = SchemaTemplate::find(&self.templates, id)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown template '{}'", id)))?;
        Ok(self.schema.apply_template(template))
    }

    // ---- extraction ----

    /// Last extraction result
    pub fn result(&self) -> Option<&AggregatedResult> {
        self.result.as_ref()
    }

    /// Run an extraction over the current files and schema
    ///
    /// Validation failures leave the previous result in place. Otherwise
    /// the previous result is dropped, the CRM status returns to idle and
    /// the new result replaces it whether it succeeded or not.
    pub async fn extract(&mut self) -> Result<&AggregatedResult> {
        self.extractor.validate(&self.files, &self.schema)?;

        self.result = None;
        self.crm_status = CrmStatus::Idle;

        let result = self.extractor.extract(&self.files, &self.schema).await?;
        Ok(&*self.result.insert(result))
    }

    // ---- CRM ----

    /// Whether a webhook is configured
    pub fn has_crm(&self) -> bool {
        self.crm.is_some()
    }

    /// Cached account list
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Fetch accounts if none are cached yet
    ///
    /// Fetch failures leave the list empty.
    pub async fn load_accounts(&mut self) -> &[Account] {
        if self.accounts.is_empty() {
            if let Some(crm) = &self.crm {
                self.accounts = crm.fetch_accounts().await;
            }
        }
        &self.accounts
    }

    /// Select the target account by id
    pub fn select_account(&mut self, id: &str) -> Result<&Account> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown account '{}'", id)))?;
        self.selected_account = Some(account.id.clone());
        Ok(account)
    }

    /// Currently selected account id
    pub fn selected_account(&self) -> Option<&str> {
        self.selected_account.as_deref()
    }

    /// Outcome of the last send
    pub fn crm_status(&self) -> CrmStatus {
        self.crm_status
    }

    /// Reason a send would be a no-op, if any
    pub fn send_blocker(&self) -> Option<SendBlocker> {
        if self.crm.is_none() {
            return Some(SendBlocker::NoWebhook);
        }
        match &self.result {
            None => return Some(SendBlocker::NoResult),
            Some(r) if !r.is_success() => return Some(SendBlocker::FailedResult),
            Some(_) => {}
        }
        if self.selected_account.is_none() {
            return Some(SendBlocker::NoAccount);
        }
        if self.crm_status == CrmStatus::Success {
            return Some(SendBlocker::AlreadySent);
        }
        None
    }

    /// Send the current result to the selected account
    ///
    /// Returns `None` without any request when sending is blocked.
    pub async fn send(&mut self) -> Option<CrmStatus> {
        if self.send_blocker().is_some() {
            return None;
        }
        let (crm, result, account) = match (&self.crm, &self.result, &self.selected_account) {
            (Some(crm), Some(result), Some(account)) => (crm, result, account),
            _ => return None,
        };

        self.crm_status = CrmStatus::Idle;
        let status = crm.send(account, result.data()).await;
        self.crm_status = status;
        Some(status)
    }
}
