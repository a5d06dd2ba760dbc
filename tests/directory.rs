//! Integration tests for recursive resource directory tree decoding.
//!
//! Every scenario here runs on crafted resource section buffers, exercising the
//! decoder end to end: header extraction through the standard field specification,
//! entry slot runs, child resolution with relative address arithmetic, pruning of
//! unresolvable references, and the pre-order id counter.

use rsrcscope::prelude::*;

/// Builds a 16-byte directory table header in the standard layout.
fn header(
    characteristics: u32,
    stamp: u32,
    major: u16,
    minor: u16,
    names: u16,
    ids: u16,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_SIZE);
    bytes.extend_from_slice(&characteristics.to_le_bytes());
    bytes.extend_from_slice(&stamp.to_le_bytes());
    bytes.extend_from_slice(&major.to_le_bytes());
    bytes.extend_from_slice(&minor.to_le_bytes());
    bytes.extend_from_slice(&names.to_le_bytes());
    bytes.extend_from_slice(&ids.to_le_bytes());
    bytes
}

/// Builds one 8-byte entry slot from its two little-endian dwords.
fn slot(first: u32, second: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(ENTRY_SIZE);
    bytes.extend_from_slice(&first.to_le_bytes());
    bytes.extend_from_slice(&second.to_le_bytes());
    bytes
}

/// Marks an address as a subdirectory reference.
fn subdir(rva: u32) -> u32 {
    0x8000_0000 | rva
}

fn decode(data: &[u8], diagnostics: &Diagnostics) -> Result<ResourceDirectoryTable> {
    ResourceDirectoryTable::decode(&FieldSpec::standard(), data, 0, 0, diagnostics)
}

fn node_count(table: &ResourceDirectoryTable) -> usize {
    1 + table.children().iter().map(node_count).sum::<usize>()
}

/// Name-indexed entries always precede ID-indexed entries in the decoded run,
/// regardless of what the slot bytes contain.
#[test]
fn name_entries_precede_id_entries() -> Result<()> {
    let mut data = header(0, 0, 0, 0, 1, 2);
    data.extend_from_slice(&slot(0x40, 0x100));
    data.extend_from_slice(&slot(2, 0x200));
    data.extend_from_slice(&slot(3, 0x300));

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(table.name_entry_count(), 1);
    assert_eq!(table.id_entry_count(), 2);
    assert_eq!(table.entries().len(), 3);
    assert!(table.entries()[0].is_name_entry());
    assert_eq!(table.entries()[0].name_rva(), Some(0x40));
    assert!(!table.entries()[1].is_name_entry());
    assert_eq!(table.entries()[1].resource_id(), Some(2));
    assert!(!table.entries()[2].is_name_entry());

    Ok(())
}

/// A header declaring zero entries of both kinds yields an empty table even when
/// plausible-looking entry bytes follow the header.
#[test]
fn zero_counts_ignore_trailing_bytes() -> Result<()> {
    let mut data = header(0, 0xAABB_CCDD, 0, 0, 0, 0);
    data.extend_from_slice(&slot(0xDEAD_BEEF, subdir(0x20)));

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert!(table.entries().is_empty());
    assert!(table.children().is_empty());
    assert!(!diagnostics.has_any());

    Ok(())
}

/// A decoded child's offset equals the referencing entry's stored address with the
/// subdirectory bit cleared.
#[test]
fn child_offset_matches_stored_address() -> Result<()> {
    let mut data = header(0, 0, 0, 0, 0, 1);
    data.extend_from_slice(&slot(7, subdir(24)));
    data.extend_from_slice(&header(0, 0, 0, 0, 0, 0));

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(table.entries()[0].subdir_rva(), Some(24));
    assert_eq!(table.children().len(), 1);
    assert_eq!(table.children()[0].offset(), 24);

    Ok(())
}

/// Decoding the same buffer twice yields structurally equal trees.
#[test]
fn decoding_is_deterministic() -> Result<()> {
    let mut data = header(0, 0x1111_2222, 1, 0, 1, 1);
    data.extend_from_slice(&slot(0x50, subdir(32)));
    data.extend_from_slice(&slot(9, 0x600));
    data.extend_from_slice(&header(0, 0x3333_4444, 0, 0, 0, 0));

    let first = decode(&data, &Diagnostics::new())?;
    let second = decode(&data, &Diagnostics::new())?;

    assert_eq!(first, second);

    Ok(())
}

/// The raw stamp field holds whole seconds since the Unix epoch; the calendar form
/// denotes the same instant.
#[test]
fn time_date_stamp_is_unix_seconds() -> Result<()> {
    let stamp = 1_600_000_000_u32;
    let data = header(0, stamp, 0, 0, 0, 0);

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(
        table.value(DirectoryFieldKey::TimeDateStamp),
        Some(stamp)
    );
    assert_eq!(table.time_date_stamp().timestamp(), i64::from(stamp));
    assert_eq!(table.time_date_stamp().timestamp_millis(), i64::from(stamp) * 1000);

    Ok(())
}

/// A child reference pointing past the buffer end is pruned with a diagnostic while
/// its valid sibling still decodes.
#[test]
fn out_of_range_child_is_pruned() -> Result<()> {
    let mut data = header(0, 0, 0, 0, 0, 2);
    data.extend_from_slice(&slot(1, subdir(0x5000)));
    data.extend_from_slice(&slot(2, subdir(32)));
    data.extend_from_slice(&header(0, 0, 0, 0, 0, 0));

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(table.entries().len(), 2);
    assert_eq!(table.children().len(), 1);
    assert_eq!(table.children()[0].offset(), 32);

    assert_eq!(diagnostics.count(), 1);
    assert!(diagnostics.has_warnings());
    let message = &diagnostics.iter().next().unwrap().message;
    assert!(message.contains("0x5000"));
    assert!(message.contains("id entry 1 of table 0"));

    Ok(())
}

/// A child that slices successfully but is too short for a header is pruned with an
/// error diagnostic; the parent still decodes.
#[test]
fn truncated_child_is_pruned() -> Result<()> {
    let mut data = header(0, 0, 0, 0, 0, 1);
    data.extend_from_slice(&slot(1, subdir(24)));
    data.extend_from_slice(&[0u8; 4]); // 4 bytes where a 16-byte header should be

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert!(table.children().is_empty());
    assert_eq!(diagnostics.count(), 1);
    assert!(diagnostics.has_errors());

    Ok(())
}

/// Byte-for-byte scenario: a header with stamp `DD CC BB AA`, one name entry, and a
/// slot whose subdirectory address (bit cleared) is 0 - the root's own offset. The
/// entry decodes, the self-reference is pruned as already visited.
#[test]
fn literal_header_with_self_referencing_entry() -> Result<()> {
    #[rustfmt::skip]
    let data = [
        0x00, 0x00, 0x00, 0x00, // characteristics
        0xAA, 0xBB, 0xCC, 0xDD, // time date stamp
        0x00, 0x00,             // major version
        0x00, 0x00,             // minor version
        0x01, 0x00,             // one name entry
        0x00, 0x00,             // zero id entries
        0x05, 0x00, 0x00, 0x00, // name rva = 5
        0x00, 0x00, 0x00, 0x80, // subdirectory bit set, rva = 0
    ];

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(
        table.value(DirectoryFieldKey::TimeDateStamp),
        Some(0xDDCC_BBAA)
    );
    assert_eq!(table.name_entry_count(), 1);
    assert_eq!(table.id_entry_count(), 0);
    assert_eq!(table.entries().len(), 1);
    assert_eq!(table.entries()[0].name_rva(), Some(5));
    assert_eq!(table.entries()[0].subdir_rva(), Some(0));

    // The referenced address is the root's own offset.
    assert!(table.children().is_empty());
    assert!(diagnostics.has_warnings());

    Ok(())
}

/// The same header bytes with both counts zeroed produce an empty table.
#[test]
fn literal_header_with_zero_counts() -> Result<()> {
    #[rustfmt::skip]
    let data = [
        0x00, 0x00, 0x00, 0x00,
        0xAA, 0xBB, 0xCC, 0xDD,
        0x00, 0x00,
        0x00, 0x00,
        0x00, 0x00,
        0x00, 0x00,
    ];

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(
        table.value(DirectoryFieldKey::TimeDateStamp),
        Some(0xDDCC_BBAA)
    );
    assert!(table.entries().is_empty());
    assert!(table.children().is_empty());
    assert!(!diagnostics.has_any());

    Ok(())
}

/// Ids are assigned in pre-order: parent before children, left subtree completely
/// before the right sibling.
#[test]
fn ids_are_assigned_preorder() -> Result<()> {
    // root @ 0: two subdirectory entries -> 32 bytes
    // child1 @ 32: one subdirectory entry -> 24 bytes
    // grandchild @ 56: leaf -> 16 bytes
    // child2 @ 72: leaf -> 16 bytes
    let mut data = header(0, 0, 0, 0, 0, 2);
    data.extend_from_slice(&slot(1, subdir(32)));
    data.extend_from_slice(&slot(2, subdir(72)));
    data.extend_from_slice(&header(0, 0, 0, 0, 0, 1));
    data.extend_from_slice(&slot(3, subdir(56)));
    data.extend_from_slice(&header(0, 0, 0, 0, 0, 0));
    data.extend_from_slice(&header(0, 0, 0, 0, 0, 0));

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(table.id(), 0);
    assert_eq!(table.children().len(), 2);

    let child1 = &table.children()[0];
    let child2 = &table.children()[1];

    assert_eq!(child1.id(), 1);
    assert_eq!(child1.offset(), 32);
    assert_eq!(child1.children().len(), 1);
    assert_eq!(child1.children()[0].id(), 2);
    assert_eq!(child1.children()[0].offset(), 56);

    assert_eq!(child2.id(), 3);
    assert_eq!(child2.offset(), 72);
    assert!(!diagnostics.has_any());

    Ok(())
}

/// Two tables referencing each other decode each table exactly once; the back edge
/// is pruned with a diagnostic.
#[test]
fn reference_cycle_is_pruned() -> Result<()> {
    // A @ 0 references B @ 24; B references A @ 0.
    let mut data = header(0, 0, 0, 0, 0, 1);
    data.extend_from_slice(&slot(1, subdir(24)));
    data.extend_from_slice(&header(0, 0, 0, 0, 0, 1));
    data.extend_from_slice(&slot(1, subdir(0)));

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(node_count(&table), 2);
    assert_eq!(table.children().len(), 1);
    assert!(table.children()[0].children().is_empty());

    assert_eq!(diagnostics.count(), 1);
    assert!(diagnostics.has_warnings());
    assert!(diagnostics
        .iter()
        .next()
        .unwrap()
        .message
        .contains("already visited"));

    Ok(())
}

/// A chain deeper than the recursion cap decodes exactly `MAX_DEPTH + 1` tables and
/// prunes the reference below the cap.
#[test]
fn over_deep_chain_is_capped() -> Result<()> {
    // Nodes of 24 bytes each, node i referencing node i + 1.
    let links = MAX_DEPTH + 4;
    let mut data = Vec::new();
    for i in 0..links {
        data.extend_from_slice(&header(0, 0, 0, 0, 0, 1));
        data.extend_from_slice(&slot(1, subdir(((i + 1) * 24) as u32)));
    }
    data.extend_from_slice(&header(0, 0, 0, 0, 0, 0));

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;

    assert_eq!(node_count(&table), MAX_DEPTH + 1);
    assert_eq!(diagnostics.count(), 1);
    assert!(diagnostics.has_warnings());
    assert!(diagnostics
        .iter()
        .next()
        .unwrap()
        .message
        .contains("depth cap"));

    Ok(())
}

/// Header extraction follows the supplied field specification, not a fixed layout:
/// a spec carrying only two fields decodes only those attributes, while the entry
/// counts default to zero.
#[test]
fn partial_field_specification() -> Result<()> {
    let spec = FieldSpec::from_entries([
        ("TIME_DATE_STAMP", "time date stamp", 4, 4),
        ("MAJOR_VERSION", "major version", 8, 2),
    ])?;

    let mut data = header(0xFFFF_FFFF, 0x0102_0304, 7, 9, 5, 5);
    data.extend_from_slice(&slot(1, 0x100)); // never decoded

    let diagnostics = Diagnostics::new();
    let table = ResourceDirectoryTable::decode(&spec, &data, 0, 0, &diagnostics)?;

    assert_eq!(table.header().len(), 2);
    assert_eq!(table.value(DirectoryFieldKey::TimeDateStamp), Some(0x0102_0304));
    assert_eq!(table.value(DirectoryFieldKey::MajorVersion), Some(7));
    assert_eq!(table.value(DirectoryFieldKey::Characteristics), None);

    // Counts were not part of the specification, so no entries are decoded.
    assert!(table.entries().is_empty());

    Ok(())
}

/// The textual dump renders the whole tree pre-order, entry identities included.
#[test]
fn display_dump_covers_the_tree() -> Result<()> {
    let mut data = header(0, 0, 4, 0, 0, 1);
    data.extend_from_slice(&slot(0x10, subdir(24)));
    data.extend_from_slice(&header(0, 0, 0, 0, 0, 0));

    let diagnostics = Diagnostics::new();
    let table = decode(&data, &diagnostics)?;
    let dump = table.to_string();

    assert!(dump.contains("** resource directory table 0 **"));
    assert!(dump.contains("** resource directory table 1 **"));
    assert!(dump.contains("number of id entries: 1"));
    assert!(dump.contains("id entry 1 of table 0"));
    assert!(dump.contains("subdirectory at 0x18"));

    Ok(())
}
