//! Table definitions for the leads schema.
//!
//! Child tables repeat their ancestors' key columns, so the composite keys
//! grow one column per level (buyer → tier → make → model → year).

use super::types::{ColumnDef, ForeignKeyDef, TableDef};

const SLUG: &str = "varchar(50)";
const LONG: &str = "varchar(255)";

// =============================================================================
// Lookup tables
// =============================================================================

pub static YEAR: TableDef = TableDef {
    name: "year",
    columns: &[ColumnDef::key("slug", SLUG), ColumnDef::required("name", SLUG)],
    unique: &[&["name"]],
    foreign_keys: &[],
};

pub static COUNTRY: TableDef = TableDef {
    name: "country",
    columns: &[
        ColumnDef::key("slug", SLUG),
        ColumnDef::required("name", SLUG),
        ColumnDef::required("abbr", SLUG),
    ],
    unique: &[&["name"], &["abbr"]],
    foreign_keys: &[],
};

pub static COUNTRY_STATE: TableDef = TableDef {
    name: "country_state",
    columns: &[
        ColumnDef::key("country_slug", SLUG),
        ColumnDef::key("slug", SLUG),
        ColumnDef::required("name", SLUG),
        ColumnDef::required("abbr", SLUG),
    ],
    unique: &[&["country_slug", "name"], &["country_slug", "abbr"]],
    foreign_keys: &[ForeignKeyDef {
        columns: &["country_slug"],
        references: "country",
        referenced_columns: &["slug"],
    }],
};

// =============================================================================
// Makes
// =============================================================================

pub static MAKE: TableDef = TableDef {
    name: "make",
    columns: &[ColumnDef::key("slug", SLUG), ColumnDef::required("name", SLUG)],
    unique: &[&["name"]],
    foreign_keys: &[],
};

pub static MAKE_YEAR: TableDef = TableDef {
    name: "make_year",
    columns: &[ColumnDef::key("make_slug", SLUG), ColumnDef::key("year_slug", SLUG)],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef { columns: &["make_slug"], references: "make", referenced_columns: &["slug"] },
        ForeignKeyDef { columns: &["year_slug"], references: "year", referenced_columns: &["slug"] },
    ],
};

pub static MAKE_MODEL: TableDef = TableDef {
    name: "make_model",
    columns: &[
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("slug", SLUG),
        ColumnDef::required("name", SLUG),
    ],
    unique: &[&["make_slug", "name"]],
    foreign_keys: &[ForeignKeyDef {
        columns: &["make_slug"],
        references: "make",
        referenced_columns: &["slug"],
    }],
};

pub static MAKE_MODEL_YEAR: TableDef = TableDef {
    name: "make_model_year",
    columns: &[
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("model_slug", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["make_slug", "model_slug"],
            references: "make_model",
            referenced_columns: &["make_slug", "slug"],
        },
        ForeignKeyDef {
            columns: &["make_slug", "year_slug"],
            references: "make_year",
            referenced_columns: &["make_slug", "year_slug"],
        },
    ],
};

// =============================================================================
// Buyers
// =============================================================================

pub static BUYER: TableDef = TableDef {
    name: "buyer",
    columns: &[ColumnDef::key("slug", SLUG), ColumnDef::required("name", SLUG)],
    unique: &[&["name"]],
    foreign_keys: &[],
};

pub static BUYER_YEAR: TableDef = TableDef {
    name: "buyer_year",
    columns: &[ColumnDef::key("buyer_slug", SLUG), ColumnDef::key("year_slug", SLUG)],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef { columns: &["buyer_slug"], references: "buyer", referenced_columns: &["slug"] },
        ForeignKeyDef { columns: &["year_slug"], references: "year", referenced_columns: &["slug"] },
    ],
};

pub static BUYER_MAKE: TableDef = TableDef {
    name: "buyer_make",
    columns: &[ColumnDef::key("buyer_slug", SLUG), ColumnDef::key("make_slug", SLUG)],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef { columns: &["buyer_slug"], references: "buyer", referenced_columns: &["slug"] },
        ForeignKeyDef { columns: &["make_slug"], references: "make", referenced_columns: &["slug"] },
    ],
};

pub static BUYER_MAKE_YEAR: TableDef = TableDef {
    name: "buyer_make_year",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "make_slug"],
            references: "buyer_make",
            referenced_columns: &["buyer_slug", "make_slug"],
        },
        ForeignKeyDef {
            columns: &["make_slug", "year_slug"],
            references: "make_year",
            referenced_columns: &["make_slug", "year_slug"],
        },
    ],
};

pub static BUYER_MAKE_MODEL: TableDef = TableDef {
    name: "buyer_make_model",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("model_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "make_slug"],
            references: "buyer_make",
            referenced_columns: &["buyer_slug", "make_slug"],
        },
        ForeignKeyDef {
            columns: &["make_slug", "model_slug"],
            references: "make_model",
            referenced_columns: &["make_slug", "slug"],
        },
    ],
};

pub static BUYER_MAKE_MODEL_YEAR: TableDef = TableDef {
    name: "buyer_make_model_year",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("model_slug", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "make_slug", "model_slug"],
            references: "buyer_make_model",
            referenced_columns: &["buyer_slug", "make_slug", "model_slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "make_slug", "year_slug"],
            references: "buyer_make_year",
            referenced_columns: &["buyer_slug", "make_slug", "year_slug"],
        },
    ],
};

// =============================================================================
// Buyer tiers
// =============================================================================

pub static BUYER_TIER: TableDef = TableDef {
    name: "buyer_tier",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("slug", SLUG),
        ColumnDef::required("name", SLUG),
    ],
    unique: &[&["buyer_slug", "name"]],
    foreign_keys: &[ForeignKeyDef {
        columns: &["buyer_slug"],
        references: "buyer",
        referenced_columns: &["slug"],
    }],
};

pub static LEGACY_BUYER_TIER: TableDef = TableDef {
    name: "legacy_buyer_tier",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("buyer_tier_slug", SLUG),
        ColumnDef::required("legacy_id", "integer"),
        ColumnDef::required("legacy_name", SLUG),
    ],
    unique: &[&["legacy_id"], &["legacy_name"]],
    foreign_keys: &[ForeignKeyDef {
        columns: &["buyer_slug", "buyer_tier_slug"],
        references: "buyer_tier",
        referenced_columns: &["buyer_slug", "slug"],
    }],
};

pub static BUYER_TIER_YEAR: TableDef = TableDef {
    name: "buyer_tier_year",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("tier_slug", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "tier_slug"],
            references: "buyer_tier",
            referenced_columns: &["buyer_slug", "slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "year_slug"],
            references: "buyer_year",
            referenced_columns: &["buyer_slug", "year_slug"],
        },
    ],
};

pub static BUYER_TIER_MAKE: TableDef = TableDef {
    name: "buyer_tier_make",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("tier_slug", SLUG),
        ColumnDef::key("make_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "tier_slug"],
            references: "buyer_tier",
            referenced_columns: &["buyer_slug", "slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "make_slug"],
            references: "buyer_make",
            referenced_columns: &["buyer_slug", "make_slug"],
        },
    ],
};

pub static BUYER_TIER_MAKE_YEAR: TableDef = TableDef {
    name: "buyer_tier_make_year",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("tier_slug", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "tier_slug", "make_slug"],
            references: "buyer_tier_make",
            referenced_columns: &["buyer_slug", "tier_slug", "make_slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "tier_slug", "year_slug"],
            references: "buyer_tier_year",
            referenced_columns: &["buyer_slug", "tier_slug", "year_slug"],
        },
    ],
};

pub static BUYER_TIER_MAKE_MODEL: TableDef = TableDef {
    name: "buyer_tier_make_model",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("tier_slug", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("model_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "tier_slug", "make_slug"],
            references: "buyer_tier_make",
            referenced_columns: &["buyer_slug", "tier_slug", "make_slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "make_slug", "model_slug"],
            references: "buyer_make_model",
            referenced_columns: &["buyer_slug", "make_slug", "model_slug"],
        },
    ],
};

pub static BUYER_TIER_MAKE_MODEL_YEAR: TableDef = TableDef {
    name: "buyer_tier_make_model_year",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("tier_slug", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("model_slug", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "tier_slug", "make_slug", "model_slug"],
            references: "buyer_tier_make_model",
            referenced_columns: &["buyer_slug", "tier_slug", "make_slug", "model_slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "tier_slug", "make_slug", "year_slug"],
            references: "buyer_tier_make_year",
            referenced_columns: &["buyer_slug", "tier_slug", "make_slug", "year_slug"],
        },
    ],
};

// =============================================================================
// Buyer dealers
// =============================================================================

pub static BUYER_DEALER: TableDef = TableDef {
    name: "buyer_dealer",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("code", SLUG),
        ColumnDef::optional("name", LONG),
        ColumnDef::optional("address", LONG),
        ColumnDef::optional("city", LONG),
        ColumnDef::optional("state", SLUG),
        ColumnDef::optional("zipcode", LONG),
        ColumnDef::optional("country_slug", SLUG),
        ColumnDef::optional("phone", LONG),
    ],
    unique: &[&["buyer_slug", "name", "address", "city", "state", "zipcode"]],
    foreign_keys: &[
        ForeignKeyDef { columns: &["buyer_slug"], references: "buyer", referenced_columns: &["slug"] },
        ForeignKeyDef {
            columns: &["country_slug", "state"],
            references: "country_state",
            referenced_columns: &["country_slug", "abbr"],
        },
    ],
};

pub static BUYER_DEALER_YEAR: TableDef = TableDef {
    name: "buyer_dealer_year",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("dealer_code", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "dealer_code"],
            references: "buyer_dealer",
            referenced_columns: &["buyer_slug", "code"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "year_slug"],
            references: "buyer_year",
            referenced_columns: &["buyer_slug", "year_slug"],
        },
    ],
};

pub static BUYER_DEALER_MAKE: TableDef = TableDef {
    name: "buyer_dealer_make",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("dealer_code", SLUG),
        ColumnDef::key("make_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "dealer_code"],
            references: "buyer_dealer",
            referenced_columns: &["buyer_slug", "code"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "make_slug"],
            references: "buyer_make",
            referenced_columns: &["buyer_slug", "make_slug"],
        },
    ],
};

pub static BUYER_DEALER_MAKE_YEAR: TableDef = TableDef {
    name: "buyer_dealer_make_year",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("dealer_code", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "dealer_code", "make_slug"],
            references: "buyer_dealer_make",
            referenced_columns: &["buyer_slug", "dealer_code", "make_slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "dealer_code", "year_slug"],
            references: "buyer_dealer_year",
            referenced_columns: &["buyer_slug", "dealer_code", "year_slug"],
        },
    ],
};

pub static BUYER_DEALER_MAKE_MODEL: TableDef = TableDef {
    name: "buyer_dealer_make_model",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("dealer_code", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("model_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "dealer_code", "make_slug"],
            references: "buyer_dealer_make",
            referenced_columns: &["buyer_slug", "dealer_code", "make_slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "make_slug", "model_slug"],
            references: "buyer_make_model",
            referenced_columns: &["buyer_slug", "make_slug", "model_slug"],
        },
    ],
};

pub static BUYER_DEALER_MAKE_MODEL_YEAR: TableDef = TableDef {
    name: "buyer_dealer_make_model_year",
    columns: &[
        ColumnDef::key("buyer_slug", SLUG),
        ColumnDef::key("dealer_code", SLUG),
        ColumnDef::key("make_slug", SLUG),
        ColumnDef::key("model_slug", SLUG),
        ColumnDef::key("year_slug", SLUG),
    ],
    unique: &[],
    foreign_keys: &[
        ForeignKeyDef {
            columns: &["buyer_slug", "dealer_code", "make_slug", "model_slug"],
            references: "buyer_dealer_make_model",
            referenced_columns: &["buyer_slug", "dealer_code", "make_slug", "model_slug"],
        },
        ForeignKeyDef {
            columns: &["buyer_slug", "dealer_code", "make_slug", "year_slug"],
            references: "buyer_dealer_make_year",
            referenced_columns: &["buyer_slug", "dealer_code", "make_slug", "year_slug"],
        },
    ],
};

// =============================================================================
// Coverage
// =============================================================================

/// Keyed by tier slug and dealer code only, without the owning buyer, so
/// it carries no foreign keys to `buyer_tier` or `buyer_dealer`.
pub static BUYER_TIER_DEALER_COVERAGE: TableDef = TableDef {
    name: "buyer_tier_dealer_coverage",
    columns: &[
        ColumnDef::key("buyer_tier_slug", SLUG),
        ColumnDef::key("dealer_code", SLUG),
        ColumnDef::key("zipcode", LONG),
        ColumnDef::optional("distance", "integer"),
    ],
    unique: &[],
    foreign_keys: &[],
};

/// Every table, parents before children.
pub static ALL_TABLES: &[&TableDef] = &[
    &YEAR,
    &COUNTRY,
    &COUNTRY_STATE,
    &MAKE,
    &MAKE_YEAR,
    &MAKE_MODEL,
    &MAKE_MODEL_YEAR,
    &BUYER,
    &BUYER_YEAR,
    &BUYER_MAKE,
    &BUYER_MAKE_YEAR,
    &BUYER_MAKE_MODEL,
    &BUYER_MAKE_MODEL_YEAR,
    &BUYER_TIER,
    &LEGACY_BUYER_TIER,
    &BUYER_TIER_YEAR,
    &BUYER_TIER_MAKE,
    &BUYER_TIER_MAKE_YEAR,
    &BUYER_TIER_MAKE_MODEL,
    &BUYER_TIER_MAKE_MODEL_YEAR,
    &BUYER_DEALER,
    &BUYER_DEALER_YEAR,
    &BUYER_DEALER_MAKE,
    &BUYER_DEALER_MAKE_YEAR,
    &BUYER_DEALER_MAKE_MODEL,
    &BUYER_DEALER_MAKE_MODEL_YEAR,
    &BUYER_TIER_DEALER_COVERAGE,
];
