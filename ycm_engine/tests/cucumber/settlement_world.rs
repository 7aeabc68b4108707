use std::sync::Arc;

use cucumber::World;
use log::*;
use ycm_engine::{
    events::EventProducers,
    test_utils::prepare_env::new_test_database,
    MemberApi,
    NameMappings,
    SettlementApi,
    SettlementError,
    SettlementOutcome,
    SqliteDatabase,
};

#[derive(Default, Debug, World)]
pub struct SettlementWorld {
    pub system: Option<SettlementSystem>,
    pub mappings: NameMappings,
    pub last_result: Option<Result<SettlementOutcome, SettlementError>>,
}

#[derive(Debug)]
pub struct SettlementSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub api: SettlementApi<SqliteDatabase>,
    pub members: MemberApi<SqliteDatabase>,
}

impl SettlementWorld {
    pub fn system(&self) -> &SettlementSystem {
        self.system.as_ref().expect("Settlement system not initialised")
    }

    pub fn api(&self) -> &SettlementApi<SqliteDatabase> {
        &self.system().api
    }

    pub fn db(&self) -> &SqliteDatabase {
        &self.system().db
    }

    pub fn last_result(&self) -> &Result<SettlementOutcome, SettlementError> {
        self.last_result.as_ref().expect("No booking has been received yet")
    }
}

impl SettlementSystem {
    pub async fn new(mappings: NameMappings) -> Self {
        let (db_path, db) = new_test_database().await;
        debug!("🚀️ Created database: {db_path}");
        let api = SettlementApi::new(db.clone(), Arc::new(mappings), EventProducers::default());
        let members = MemberApi::new(db.clone());
        Self { db_path, db, api, members }
    }

    pub fn into_parts(self) -> (String, SqliteDatabase) {
        (self.db_path, self.db)
    }
}
