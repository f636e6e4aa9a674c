//! End-to-end archive round trips: build with the editor, reopen with the
//! parser, and check that payloads, comments, and layout survive.

use zipedit::{
    Archive, CompressionLevel, CompressionMethod, EditableArchive, EncryptionMethod,
    EntryOptions, Preview, TextEncoding, ZipError, DEFAULT_PEEK_LIMIT,
};

const LOREM: &str = "Lorem ipsum dolor sit amet. Id eveniet omnis vel magnam molestiae eum maxime dolor ad ipsam veritatis a voluptas expedita et galisum expedita est suscipit soluta. Et iure quasi nam ullam eius et voluptatem galisum ea corporis pariatur et aliquid tenetur eum dolorum corporis hic consequatur esse. Qui velit adipisci sed magni dolor id nobis eveniet non sunt ipsa rem nobis nesciunt? Aut voluptas error hic rerum deserunt a sequi quidem ab quam cupiditate est deserunt quasi ad eveniet maiores sit sequi esse! Ea dolores voluptates sit debitis provident aut architecto dignissimos non itaque voluptatibus sit quia recusandae vel aliquam galisum. Quo cumque omnis ab rerum consequatur et cumque consectetur et dolorem nihil. At enim dolorem sit voluptates quia est voluptatibus dolore est consequuntur quasi qui nostrum voluptatem. Qui quasi magni id perferendis sequi aut voluptatem dicta. Eos eaque omnis sit natus molestias ab aliquid ratione sed dolor quia ut galisum molestias sit iste totam. Qui ipsa quasi ad fugit nihil ut necessitatibus unde aut numquam error. 33 commodi deleniti aut consequatur eius aut rerum tempora? Est consequatur magnam et adipisci minima 33 similique eligendi non dolor aperiam aut molestiae eius? Sit nostrum consequatur qui mollitia vero est esse aperiam quo repellat velit sit saepe soluta sed recusandae fuga in sunt enim. Hic unde officiis ut dolores soluta ut atque accusamus ad veritatis placeat qui velit atque qui delectus perferendis qui voluptate provident. Ab deserunt laborum cum possimus provident non molestias magni et quidem minus? Ut eaque culpa cum corporis vitae et similique perspiciatis eum illo praesentium a adipisci quaerat est modi nemo. Ut eligendi necessitatibus non mollitia aliquam ex nostrum perferendis eos modi praesentium vel quia omnis. Et nesciunt aliquam rem eius inventore aut distinctio esse ut excepturi amet a placeat asperiores sed culpa eius est recusandae iure. Et aspernatur facere id excepturi sapiente aut corrupti pariatur et atque laborum 33 consequatur iure aut sint consequatur. Eum exercitationem illum qui modi voluptas non dicta quisquam ea debitis commodi et nobis quia. Sit ipsa voluptatem nam perspiciatis iusto ut molestias maxime aut quam saepe ea consequatur minus. Ut tempore error et voluptates perferendis ea iure dolorum qui consequatur dolores. Rem nihil esse aut tenetur libero qui incidunt voluptas ut fugit repellendus ut ratione labore. Et facilis iusto nam voluptatum unde eum quibusdam voluptatem ut nihil temporibus et accusantium voluptatem et vitae quibusdam qui blanditiis tenetur. Quo quis omnis a tenetur nemo est porro nulla et itaque ipsum vel iusto dignissimos qui incidunt consequuntur sed explicabo nihil.";

fn build_single(method: CompressionMethod, level: CompressionLevel) -> Vec<u8> {
    let mut editable = EditableArchive::new();
    editable
        .create_file(
            "lorem.txt",
            LOREM,
            &EntryOptions::new()
                .compression(method)
                .level(level)
                .comment("LOREM"),
        )
        .unwrap();
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "Lorem").unwrap();
    bytes
}

#[test]
fn test_stored_roundtrip() {
    let bytes = build_single(CompressionMethod::Stored, CompressionLevel::Normal);
    let archive = Archive::open(&bytes[..]).unwrap();

    assert_eq!(archive.total_entries(), 1);
    let entry = &archive.entries()[0];
    assert_eq!(entry.name(), "lorem.txt");
    assert_eq!(entry.contents(), LOREM.as_bytes());
    assert_eq!(entry.compression_method(), CompressionMethod::Stored);
    assert_eq!(entry.encryption_method(), EncryptionMethod::Unencrypted);
    assert_eq!(entry.compressed_size(), LOREM.len() as u64);
}

#[test]
fn test_every_codec_roundtrips() {
    for method in [
        CompressionMethod::Deflate,
        CompressionMethod::Deflate64,
        CompressionMethod::Bzip2,
        CompressionMethod::Zstandard,
        CompressionMethod::Xz,
    ] {
        let bytes = build_single(method, CompressionLevel::Normal);
        let archive = Archive::open(&bytes[..]).unwrap();
        let entry = &archive.entries()[0];
        assert_eq!(entry.contents(), LOREM.as_bytes(), "method {method}");
        assert_eq!(entry.compression_method(), method);
        assert!(
            entry.compressed_size() < entry.uncompressed_size(),
            "method {method} did not shrink the text"
        );
    }
}

#[test]
fn test_deflate_maximum_with_comments() {
    let bytes = build_single(CompressionMethod::Deflate, CompressionLevel::Maximum);
    let archive = Archive::open(&bytes[..]).unwrap();

    assert_eq!(archive.comment(), "Lorem");
    let entry = &archive.entries()[0];
    assert_eq!(entry.contents(), LOREM.as_bytes());
    assert_eq!(entry.comment(), "LOREM");
    assert_eq!(entry.compression_level(), Some(CompressionLevel::Maximum));
    assert!(entry.last_modified().is_some());
}

#[test]
fn test_encrypted_roundtrip_and_wrong_password() {
    let mut editable = EditableArchive::with_options(
        Some("verysecurepassword"),
        EncryptionMethod::ZipCrypto,
        TextEncoding::Utf8,
    );
    editable
        .create_file(
            "lorem.txt",
            LOREM,
            &EntryOptions::new().compression(CompressionMethod::Deflate),
        )
        .unwrap();
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "").unwrap();

    let archive =
        Archive::open_with(&bytes[..], Some("verysecurepassword"), TextEncoding::Utf8).unwrap();
    let entry = &archive.entries()[0];
    assert_eq!(entry.contents(), LOREM.as_bytes());
    assert_eq!(entry.encryption_method(), EncryptionMethod::ZipCrypto);
    // the stored payload carries the 12-byte encryption header
    assert!(entry.compressed_size() >= 12);

    match Archive::open_with(&bytes[..], Some("wrongpassword"), TextEncoding::Utf8) {
        Err(ZipError::WrongPassword) => {}
        other => panic!("expected WrongPassword, got {:?}", other.err()),
    }
    match Archive::open(&bytes[..]) {
        Err(ZipError::WrongPassword) => {}
        other => panic!("expected WrongPassword without password, got {:?}", other.err()),
    }
}

#[test]
fn test_reparse_is_byte_identical() {
    let mut editable = EditableArchive::new();
    editable
        .create_file(
            "a/lorem.txt",
            LOREM,
            &EntryOptions::new().compression(CompressionMethod::Deflate),
        )
        .unwrap();
    editable
        .create_file("a/raw.bin", vec![7u8; 512], &EntryOptions::new())
        .unwrap();
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "round").unwrap();

    let archive = Archive::open(&bytes[..]).unwrap();
    let mut reemitted = Vec::new();
    archive.write_to(&mut reemitted).unwrap();
    assert_eq!(reemitted, bytes);
}

#[test]
fn test_end_record_agrees_after_reparse() {
    let mut editable = EditableArchive::new();
    for i in 0..5 {
        editable
            .create_file(
                &format!("files/f{i}.txt"),
                format!("body {i}"),
                &EntryOptions::new(),
            )
            .unwrap();
    }
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "totals").unwrap();

    // files/ marker + five files; the parser cross-checks entry counts and
    // CRCs against the central directory and end record while opening
    let archive = Archive::open(&bytes[..]).unwrap();
    assert_eq!(archive.total_entries(), 6);
    assert_eq!(archive.comment(), "totals");

    // and a byte-identical re-emission parses to the same shape
    let mut reemitted = Vec::new();
    archive.write_to(&mut reemitted).unwrap();
    let again = Archive::open(&reemitted[..]).unwrap();
    assert_eq!(again.total_entries(), 6);
}

#[test]
fn test_empty_archive_roundtrip() {
    let editable = EditableArchive::new();
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "").unwrap();
    assert_eq!(bytes.len(), 22);

    let archive = Archive::open(&bytes[..]).unwrap();
    assert_eq!(archive.total_entries(), 0);
    assert_eq!(archive.comment(), "");
    assert_eq!(archive.compression_method(), None);
}

#[test]
fn test_single_empty_file() {
    let mut editable = EditableArchive::new();
    editable
        .create_file("empty.txt", Vec::new(), &EntryOptions::new())
        .unwrap();
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "").unwrap();

    let archive = Archive::open(&bytes[..]).unwrap();
    let entry = &archive.entries()[0];
    assert_eq!(entry.uncompressed_size(), 0);
    assert_eq!(entry.crc32(), 0);
    assert!(entry.contents().is_empty());
}

#[test]
fn test_compression_summary() {
    let mut editable = EditableArchive::new();
    editable
        .create_file(
            "mixed/a.txt",
            "aaa",
            &EntryOptions::new().compression(CompressionMethod::Deflate),
        )
        .unwrap();
    editable
        .create_file("mixed/b.txt", "bbb", &EntryOptions::new())
        .unwrap();
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "").unwrap();

    // directory markers are stored but don't break a uniform summary
    let archive = Archive::open(&bytes[..]).unwrap();
    assert_eq!(archive.compression_method(), None);

    let uniform = build_single(CompressionMethod::Bzip2, CompressionLevel::Normal);
    let archive = Archive::open(&uniform[..]).unwrap();
    assert_eq!(archive.compression_method(), Some(CompressionMethod::Bzip2));
}

#[test]
fn test_peek_all_and_truncation() {
    let bytes = build_single(CompressionMethod::Deflate, CompressionLevel::Normal);
    let archive = Archive::open(&bytes[..]).unwrap();

    let peeked = archive.peek_all(TextEncoding::Utf8, false, true, DEFAULT_PEEK_LIMIT);
    assert_eq!(peeked.len(), 1);
    assert_eq!(peeked[0].0, "lorem.txt");
    assert_eq!(peeked[0].1, Preview::Text(LOREM.to_string()));

    // LOREM is longer than 100 chars, so the clipped view is half the limit
    let clipped = archive.peek_all(TextEncoding::Utf8, false, false, 100);
    match &clipped[0].1 {
        Preview::Text(text) => {
            assert!(text.starts_with(&LOREM[..50]));
            assert!(text.ends_with("File too large to display"));
        }
        other => panic!("expected clipped text, got {:?}", other),
    }
}

#[test]
fn test_peek_all_can_include_directories() {
    let mut editable = EditableArchive::new();
    editable
        .create_file("docs/a.txt", "text", &EntryOptions::new())
        .unwrap();
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "").unwrap();
    let archive = Archive::open(&bytes[..]).unwrap();

    let without = archive.peek_all(TextEncoding::Utf8, false, true, DEFAULT_PEEK_LIMIT);
    assert_eq!(without.len(), 1);

    let with = archive.peek_all(TextEncoding::Utf8, true, true, DEFAULT_PEEK_LIMIT);
    assert_eq!(with.len(), 2);
    assert_eq!(with[0], ("docs/".to_string(), Preview::Folder));
}

#[test]
fn test_edit_preserves_entries() {
    let bytes = build_single(CompressionMethod::Deflate, CompressionLevel::Maximum);
    let archive = Archive::open(&bytes[..]).unwrap();

    let editable = archive.edit().unwrap();
    let mut resaved = Vec::new();
    editable.save(&mut resaved, archive.comment()).unwrap();

    let reopened = Archive::open(&resaved[..]).unwrap();
    let entry = &reopened.entries()[0];
    assert_eq!(entry.contents(), LOREM.as_bytes());
    assert_eq!(entry.compression_method(), CompressionMethod::Deflate);
    assert_eq!(entry.compression_level(), Some(CompressionLevel::Maximum));
    assert_eq!(entry.comment(), "LOREM");
    assert_eq!(reopened.comment(), "Lorem");
}

#[test]
fn test_set_password_encrypts_everything() {
    let bytes = build_single(CompressionMethod::Deflate, CompressionLevel::Normal);
    let archive = Archive::open(&bytes[..]).unwrap();

    let locked = archive
        .set_password("verysecurepassword", EncryptionMethod::ZipCrypto)
        .unwrap();
    let mut encrypted = Vec::new();
    locked.save(&mut encrypted, "").unwrap();

    match Archive::open(&encrypted[..]) {
        Err(ZipError::WrongPassword) => {}
        other => panic!("expected WrongPassword, got {:?}", other.err()),
    }

    let reopened = Archive::open_with(
        &encrypted[..],
        Some("verysecurepassword"),
        TextEncoding::Utf8,
    )
    .unwrap();
    let entry = &reopened.entries()[0];
    assert_eq!(entry.encryption_method(), EncryptionMethod::ZipCrypto);
    assert_eq!(entry.contents(), LOREM.as_bytes());
}

#[test]
fn test_extract_all() {
    let dir = tempfile::tempdir().unwrap();
    let mut editable = EditableArchive::new();
    editable
        .create_file("out/nested/lorem.txt", LOREM, &EntryOptions::new())
        .unwrap();
    let mut bytes = Vec::new();
    editable.save(&mut bytes, "").unwrap();

    let archive = Archive::open(&bytes[..]).unwrap();
    archive.extract_all(dir.path()).unwrap();

    let extracted = std::fs::read_to_string(dir.path().join("out/nested/lorem.txt")).unwrap();
    assert_eq!(extracted, LOREM);
    assert!(dir.path().join("out/nested").is_dir());
}
