//! Reporting facade.

use chrono::NaiveDateTime;
use tracing::{debug, instrument};

use crate::{
    Gateway,
    api::{require_id, require_payload},
    config::ApiFamily,
    domain::{Criteria, SearchQuery, Transaction, TransactionRecord, report::SearchResults},
    error::Result,
    transport::{Executer, HttpMethod},
};

/// Transaction search and lookup.
///
/// Authorized with the reporting API key.
#[derive(Debug)]
pub struct ReportingApi<'a, E> {
    gateway: &'a Gateway<E>,
}

impl<'a, E: Executer> ReportingApi<'a, E> {
    pub(crate) const fn new(gateway: &'a Gateway<E>) -> Self {
        Self { gateway }
    }

    /// Searches transactions created between `start_date` and `end_date`
    /// that match every criterion, returning rows `start_row..=end_row`.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`](crate::BeanstreamError::InvalidArgument)
    /// if the row or date window is inverted or `start_row` is zero.
    #[instrument(skip(self, criteria), fields(criteria = criteria.len()))]
    pub async fn query(
        &self,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        start_row: u32,
        end_row: u32,
        criteria: Vec<Criteria>,
    ) -> Result<Vec<TransactionRecord>> {
        let query = SearchQuery::new(start_date, end_date, start_row, end_row, criteria)?;
        self.search(&query).await
    }

    /// Runs a prepared search.
    ///
    /// # Errors
    ///
    /// Returns any gateway or transport error.
    #[instrument(skip(self, query))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<TransactionRecord>> {
        let body = require_payload("query", query)?;
        let url = self.gateway.endpoints().reports()?;
        let command =
            self.gateway.command(ApiFamily::Reporting, HttpMethod::Post, url)?.with_payload(body);
        let results: SearchResults = self.gateway.send(command).await?;
        debug!(records = results.records.len(), "search returned");
        Ok(results.records)
    }

    /// Looks up a transaction through the payments endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`](crate::BeanstreamError::InvalidArgument)
    /// naming `TransId` for a blank id.
    #[instrument(skip(self))]
    pub async fn get_transaction(&self, trans_id: &str) -> Result<Transaction> {
        let trans_id = require_id("TransId", trans_id)?;
        let url = self.gateway.endpoints().payment(trans_id)?;
        let command = self.gateway.command(ApiFamily::Reporting, HttpMethod::Get, url)?;
        self.gateway.send(command).await
    }
}
