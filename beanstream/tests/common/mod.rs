//! Shared test doubles.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use beanstream::{
    Gateway, GatewayConfig, Result,
    transport::{Command, CommandResult, Executer, error_map},
};

pub const MERCHANT_ID: u32 = 100_000_000;
pub const PAYMENTS_KEY: &str = "F6EF00BDB80748358D52D8605CDC7027";
pub const PROFILES_KEY: &str = "D97D3BE1EE964A6193D17A571D9FBC80";
pub const REPORTING_KEY: &str = "4e6Ff318bee64EA391609de89aD4CF5d";

type Responder = dyn Fn(&Command) -> Result<CommandResult> + Send + Sync;

/// Executer answering every command with a canned response and recording it.
pub struct FakeExecuter {
    responder: Box<Responder>,
    commands: Mutex<Vec<Command>>,
}

impl std::fmt::Debug for FakeExecuter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeExecuter").finish_non_exhaustive()
    }
}

impl FakeExecuter {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&Command) -> Result<CommandResult> + Send + Sync + 'static,
    {
        Arc::new(Self { responder: Box::new(responder), commands: Mutex::new(Vec::new()) })
    }

    /// Responds with `status` and `body`, mapped exactly as the HTTP executer maps them.
    pub fn responding(status: u16, body: &'static str) -> Arc<Self> {
        Self::new(move |_| error_map::into_result(status, body.to_owned()))
    }

    pub fn calls(&self) -> usize {
        self.commands.lock().expect("lock poisoned").len()
    }

    pub fn last_command(&self) -> Command {
        self.commands.lock().expect("lock poisoned").last().cloned().expect("no command recorded")
    }
}

impl Executer for FakeExecuter {
    async fn execute(&self, command: &Command) -> Result<CommandResult> {
        self.commands.lock().expect("lock poisoned").push(command.clone());
        (self.responder)(command)
    }
}

pub fn config() -> GatewayConfig {
    GatewayConfig::new(MERCHANT_ID)
        .with_payments_api_key(PAYMENTS_KEY)
        .with_profiles_api_key(PROFILES_KEY)
        .with_reporting_api_key(REPORTING_KEY)
}

pub fn gateway(executer: &Arc<FakeExecuter>) -> Gateway<Arc<FakeExecuter>> {
    Gateway::with_executer(config(), Arc::clone(executer)).expect("valid test config")
}
