use pocket_wishlist::spreadsheet::{
    export_cards_to_file, export_wishlist_to_file, import_into_store, read_wishlist_file,
    write_template_file,
};
use pocket_wishlist::{
    filter_cards, Card, ExportError, FilterCriteria, ImportError, MemoryStorage, WishlistStore,
};
use std::io::Write;
use tempfile::{Builder, TempDir};

fn csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn test_import_adds_only_new_cards() {
    let file = csv_file(
        "Set,Number,Pokemon,Rarity,Rarity Code,Packs\n\
         A1,1,Bulbasaur,Common,C,\"Mewtwo, Pikachu\"\n\
         A1,4,Charmander,Common,C,Charizard\n",
    );
    let store = WishlistStore::new(MemoryStorage::new());
    store.add(&Card::new("A1", 1, "Bulbasaur")).unwrap();

    let cards = read_wishlist_file(file.path()).unwrap();
    assert_eq!(cards[0].packs, vec!["Mewtwo", "Pikachu"]);

    assert_eq!(import_into_store(&store, &cards).unwrap(), 1);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_import_with_bad_row_adds_nothing() {
    let file = csv_file(
        "Set,Number,Name\n\
         A1,1,Bulbasaur\n\
         A1,abc,Broken\n\
         ,5,NoSet\n",
    );

    let err = read_wishlist_file(file.path()).unwrap_err();
    match err {
        ImportError::InvalidRows {
            details,
            valid_items,
        } => {
            assert_eq!(valid_items, 1);
            assert_eq!(
                details,
                vec![
                    "Row 3: Invalid card number".to_string(),
                    "Row 4: Missing required fields (Set and Number)".to_string(),
                ]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_import_rejects_other_extensions() {
    let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "Set,Number\nA1,1\n").unwrap();

    let err = read_wishlist_file(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFile(_)));
}

#[test]
fn test_template_file_imports_cleanly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.csv");
    write_template_file(&path).unwrap();

    let cards = read_wishlist_file(&path).unwrap();
    assert_eq!(cards.len(), 4);
}

#[test]
fn test_wishlist_export_then_import() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wishlist.csv");

    let store = WishlistStore::new(MemoryStorage::new());
    store
        .add_all(&[
            Card::new("A1", 1, "Bulbasaur").with_packs(["Mewtwo", "Pikachu"]),
            Card::new("A1", 4, "Charmander").with_rarity("Common", "C"),
        ])
        .unwrap();
    assert_eq!(export_wishlist_to_file(&store.list(), &path).unwrap(), 2);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Set,Number,Name,Rarity,Rarity Code,Packs,Date Added"));

    let fresh = WishlistStore::new(MemoryStorage::new());
    let cards = read_wishlist_file(&path).unwrap();
    assert_eq!(import_into_store(&fresh, &cards).unwrap(), 2);
    let keys: Vec<String> = fresh.list().iter().map(|e| e.key().to_string()).collect();
    assert_eq!(keys, vec!["A1-1", "A1-4"]);
    assert_eq!(fresh.list()[0].card.packs, vec!["Mewtwo", "Pikachu"]);
}

#[test]
fn test_empty_exports_write_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");

    let err = export_wishlist_to_file(&[], &path).unwrap_err();
    assert!(matches!(err, ExportError::Empty("Your wishlist is empty!")));

    let nameless = vec![Card::new("A1", 9, "")];
    let err = export_cards_to_file(&nameless, &path).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Empty("No valid card data found to export!")
    ));
    assert!(!path.exists());
}

#[test]
fn test_filtered_catalog_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cards.csv");
    let catalog = vec![
        Card::new("A1", 1, "Bulbasaur").with_packs(["Mewtwo"]),
        Card::new("A1", 2, "Ivysaur").with_packs(["Charizard"]),
        Card::new("A1", 3, "Venusaur").with_packs(["Mewtwo"]),
    ];
    let criteria = FilterCriteria {
        pack: "Mewtwo".to_string(),
        ..FilterCriteria::default()
    };

    let matched: Vec<Card> = filter_cards(&catalog, &criteria)
        .cards
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(export_cards_to_file(&matched, &path).unwrap(), 2);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Bulbasaur"));
    assert!(content.contains("Venusaur"));
    assert!(!content.contains("Ivysaur"));
}
