use redb::TableDefinition;

/// Table for client-side key-value entries.
/// Key: storage key (e.g. "token", "blogDraft", "blogDraft_<id>")
/// Value: caller-encoded bytes
pub const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");
