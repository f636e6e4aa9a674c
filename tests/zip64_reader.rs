// This test crafts a minimal ZIP64 archive in memory by hand: the local and
// central headers carry 0xFFFFFFFF size placeholders and the real values live
// in 0x0001 extra records, the way large archives store them.

use zipedit::Archive;

#[test]
fn read_zip64_crafted() {
    let name = b"a.txt";
    let data = b"hello";
    let crc = crc32fast::hash(data);

    let mut bytes: Vec<u8> = Vec::new();

    // local file header with ZIP64 size placeholders
    bytes.extend_from_slice(&[0x50, 0x4b, 0x03, 0x04]);
    bytes.extend_from_slice(&45u16.to_le_bytes()); // version needed
    bytes.extend_from_slice(&0u16.to_le_bytes()); // flags
    bytes.extend_from_slice(&0u16.to_le_bytes()); // compression method (stored)
    bytes.extend_from_slice(&[0, 0, 0, 0]); // mod time/date
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&0xFFFFFFFFu32.to_le_bytes()); // compressed size
    bytes.extend_from_slice(&0xFFFFFFFFu32.to_le_bytes()); // uncompressed size
    bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
    bytes.extend_from_slice(&20u16.to_le_bytes()); // extra len: 4 + 16
    bytes.extend_from_slice(name);
    // ZIP64 extra: uncompressed (8), compressed (8)
    bytes.extend_from_slice(&0x0001u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(&(data.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&(data.len() as u64).to_le_bytes());

    bytes.extend_from_slice(data);

    // central directory header with ZIP64 sizes and offset
    let cd_offset = bytes.len() as u64;
    bytes.extend_from_slice(&[0x50, 0x4b, 0x01, 0x02]);
    bytes.push(45); // version made by
    bytes.push(3); // platform
    bytes.extend_from_slice(&45u16.to_le_bytes()); // version needed
    bytes.extend_from_slice(&0u16.to_le_bytes()); // flags
    bytes.extend_from_slice(&0u16.to_le_bytes()); // compression method
    bytes.extend_from_slice(&[0, 0, 0, 0]); // mod time/date
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&0xFFFFFFFFu32.to_le_bytes()); // compressed size
    bytes.extend_from_slice(&0xFFFFFFFFu32.to_le_bytes()); // uncompressed size
    bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
    bytes.extend_from_slice(&28u16.to_le_bytes()); // extra len: 4 + 24
    bytes.extend_from_slice(&0u16.to_le_bytes()); // comment len
    bytes.extend_from_slice(&0u16.to_le_bytes()); // disk start
    bytes.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
    bytes.extend_from_slice(&0u32.to_le_bytes()); // external attrs
    bytes.extend_from_slice(&0xFFFFFFFFu32.to_le_bytes()); // local header offset
    bytes.extend_from_slice(name);
    // ZIP64 extra: uncompressed (8), compressed (8), offset (8)
    bytes.extend_from_slice(&0x0001u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&(data.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&(data.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&0u64.to_le_bytes());

    let cd_end = bytes.len() as u64;
    let cd_size = cd_end - cd_offset;

    // ZIP64 EOCD record, which the reader recognizes and skips
    bytes.extend_from_slice(&[0x50, 0x4b, 0x06, 0x06]);
    bytes.extend_from_slice(&44u64.to_le_bytes()); // size of remaining record
    bytes.extend_from_slice(&[45, 0]); // version made by
    bytes.extend_from_slice(&[45, 0]); // version needed
    bytes.extend_from_slice(&0u32.to_le_bytes()); // disk number
    bytes.extend_from_slice(&0u32.to_le_bytes()); // disk with cd
    bytes.extend_from_slice(&1u64.to_le_bytes()); // entries on disk
    bytes.extend_from_slice(&1u64.to_le_bytes()); // total entries
    bytes.extend_from_slice(&cd_size.to_le_bytes());
    bytes.extend_from_slice(&cd_offset.to_le_bytes());

    // ZIP64 EOCD locator, also skipped
    bytes.extend_from_slice(&[0x50, 0x4b, 0x06, 0x07]);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&cd_end.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());

    // classic EOCD
    bytes.extend_from_slice(&[0x50, 0x4b, 0x05, 0x06]);
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&(cd_size as u32).to_le_bytes());
    bytes.extend_from_slice(&(cd_offset as u32).to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());

    let archive = Archive::open(&bytes[..]).expect("should open crafted zip64");
    assert_eq!(archive.total_entries(), 1);
    let entry = &archive.entries()[0];
    assert_eq!(entry.name(), "a.txt");
    assert_eq!(entry.uncompressed_size(), data.len() as u64);
    assert_eq!(entry.compressed_size(), data.len() as u64);
    assert_eq!(entry.contents(), data);
}
