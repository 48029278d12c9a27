use spill_ir::{op, Operand};
use spill_store::{
    AstKind, AstNode, AstStore, StoreError, SymEntry, SymKind, SymStore, TacStore, Token,
    TokenKind, TokenStore,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn add_update_get_round_trip() {
    let dir = tempdir().expect("tempdir");
    let mut store = AstStore::create(dir.path().join("ast.rec")).expect("create");

    let idx = store
        .add(&AstNode {
            kind: AstKind::Program,
            token: 0,
            o1: 0,
            o2: 0,
        })
        .expect("add");
    assert_eq!(idx, 1);
    assert_eq!(store.len(), 1);

    let mut node = store.get(idx).expect("get");
    node.o1 = 2;
    store.update(idx, &node).expect("update");
    assert_eq!(store.get(idx).expect("get").o1, 2);
}

#[test]
fn index_zero_is_reserved() {
    let dir = tempdir().expect("tempdir");
    let mut store = SymStore::create(dir.path().join("sym.rec")).expect("create");

    assert!(matches!(store.get(0), Err(StoreError::BadIndex(0))));
    assert!(matches!(
        store.update(0, &SymEntry::default()),
        Err(StoreError::BadIndex(0))
    ));
    assert!(matches!(store.get(1), Err(StoreError::BadIndex(1))));
}

#[test]
fn reopen_recovers_the_record_count() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("sym.rec");
    {
        let mut store = SymStore::create(&path).expect("create");
        for i in 0..3 {
            store
                .add(&SymEntry {
                    name: i + 1,
                    kind: SymKind::Variable,
                    type_ref: 0,
                    scope: 0,
                    value: 0,
                })
                .expect("add");
        }
    }

    let mut store = SymStore::open(&path).expect("open");
    assert_eq!(store.len(), 3);
    assert_eq!(store.get(2).expect("get").name, 2);
}

#[test]
fn partial_trailing_record_is_corrupt() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ast.rec");
    fs::write(&path, [0u8; 7]).expect("write");

    assert!(matches!(AstStore::open(&path), Err(StoreError::Corrupt(7))));
}

#[test]
fn tac_instructions_survive_the_store() {
    let dir = tempdir().expect("tempdir");
    let mut store = TacStore::create(dir.path().join("tac.rec")).expect("create");

    let insns = [
        op::assign(Operand::temp(0), Operand::int(10)),
        op::add(Operand::temp(1), Operand::temp(0), Operand::int(5)),
        op::halt(),
    ];
    let indices: Vec<_> = insns
        .iter()
        .map(|insn| store.add(insn).expect("add"))
        .collect();

    for (insn, idx) in insns.iter().zip(indices) {
        assert_eq!(&store.get(idx).expect("get"), insn);
    }
}

#[test]
fn token_cursor_replays_and_seeks() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("tokens.tok");
    let mut store = TokenStore::create(&path).expect("create");

    let tokens = [
        Token {
            kind: TokenKind::KwInt,
            file: 1,
            lexeme: 0,
            line: 1,
        },
        Token {
            kind: TokenKind::Identifier,
            file: 1,
            lexeme: 8,
            line: 1,
        },
        Token {
            kind: TokenKind::Eof,
            file: 1,
            lexeme: 0,
            line: 2,
        },
    ];
    for token in &tokens {
        store.append(token).expect("append");
    }

    assert_eq!(store.next().expect("next"), Some(tokens[0]));
    assert_eq!(store.next().expect("next"), Some(tokens[1]));
    assert_eq!(store.cursor(), 2);

    store.set_cursor(0).expect("seek");
    assert_eq!(store.next().expect("next"), Some(tokens[0]));

    store.set_cursor(2).expect("seek");
    assert_eq!(store.next().expect("next"), Some(tokens[2]));
    assert_eq!(store.next().expect("next"), None);
    assert!(store.set_cursor(4).is_err());

    // The stream survives reopening, cursor reset to the start.
    drop(store);
    let mut store = TokenStore::open(&path).expect("open");
    assert_eq!(store.len(), 3);
    assert_eq!(store.next().expect("next"), Some(tokens[0]));
}
