//! Initial database migration.
//!
//! Creates the enums, tables, and indexes for the political-funds
//! ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(PROFILES_SQL).await?;
        db.execute_unprepared(POLITICAL_ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(ELECTIONS_SQL).await?;
        db.execute_unprepared(CONTACTS_SQL).await?;
        db.execute_unprepared(LEDGERS_SQL).await?;
        db.execute_unprepared(JOURNALS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(MEDIA_ASSETS_SQL).await?;
        db.execute_unprepared(LEDGER_YEAR_CLOSURES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE journal_status AS ENUM ('draft', 'approved');

-- 'open' is intentionally absent: a missing closure row is open.
CREATE TYPE closure_status AS ENUM ('closed', 'locked', 'temporary_unlock');
";

const PROFILES_SQL: &str = r"
CREATE TABLE profiles (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const POLITICAL_ORGANIZATIONS_SQL: &str = r"
CREATE TABLE political_organizations (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    owner_user_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_political_organizations_owner
    ON political_organizations(owner_user_id);
";

const ELECTIONS_SQL: &str = r"
CREATE TABLE elections (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    owner_user_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_elections_owner ON elections(owner_user_id);
";

const CONTACTS_SQL: &str = r"
CREATE TABLE contacts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    name_private BOOLEAN NOT NULL DEFAULT FALSE,
    address VARCHAR(255) NOT NULL DEFAULT '',
    address_private BOOLEAN NOT NULL DEFAULT FALSE,
    occupation VARCHAR(255) NOT NULL DEFAULT '',
    occupation_private BOOLEAN NOT NULL DEFAULT FALSE,
    privacy_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const LEDGERS_SQL: &str = r"
CREATE TABLE ledgers (
    id UUID PRIMARY KEY,
    politician_id UUID NOT NULL,
    organization_id UUID REFERENCES political_organizations(id),
    election_id UUID REFERENCES elections(id),
    fiscal_year INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (organization_id IS NOT NULL OR election_id IS NOT NULL)
);

CREATE INDEX idx_ledgers_organization ON ledgers(organization_id);
CREATE INDEX idx_ledgers_election ON ledgers(election_id);
";

const JOURNALS_SQL: &str = r"
CREATE TABLE journals (
    id UUID PRIMARY KEY,
    organization_id UUID REFERENCES political_organizations(id),
    election_id UUID REFERENCES elections(id),
    journal_date DATE NOT NULL,
    description TEXT NOT NULL,
    status journal_status NOT NULL DEFAULT 'draft',
    contact_id UUID REFERENCES contacts(id),
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_journals_organization_date
    ON journals(organization_id, journal_date);
CREATE INDEX idx_journals_election ON journals(election_id);
CREATE INDEX idx_journals_status ON journals(status);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    journal_id UUID NOT NULL REFERENCES journals(id) ON DELETE CASCADE,
    account_code VARCHAR(64) NOT NULL,
    debit_amount BIGINT NOT NULL DEFAULT 0 CHECK (debit_amount >= 0),
    credit_amount BIGINT NOT NULL DEFAULT 0 CHECK (credit_amount >= 0)
);

CREATE INDEX idx_journal_entries_journal ON journal_entries(journal_id);
";

const MEDIA_ASSETS_SQL: &str = r"
CREATE TABLE media_assets (
    id UUID PRIMARY KEY,
    journal_id UUID NOT NULL REFERENCES journals(id) ON DELETE CASCADE,
    file_path TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_media_assets_journal ON media_assets(journal_id);
";

const LEDGER_YEAR_CLOSURES_SQL: &str = r"
CREATE TABLE ledger_year_closures (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES political_organizations(id),
    fiscal_year INTEGER NOT NULL,
    status closure_status NOT NULL,
    closed_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (organization_id, fiscal_year)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS ledger_year_closures;
DROP TABLE IF EXISTS media_assets;
DROP TABLE IF EXISTS journal_entries;
DROP TABLE IF EXISTS journals;
DROP TABLE IF EXISTS ledgers;
DROP TABLE IF EXISTS contacts;
DROP TABLE IF EXISTS elections;
DROP TABLE IF EXISTS political_organizations;
DROP TABLE IF EXISTS profiles;
DROP TYPE IF EXISTS closure_status;
DROP TYPE IF EXISTS journal_status;
";
