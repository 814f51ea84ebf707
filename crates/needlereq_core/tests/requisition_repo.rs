use chrono::NaiveDate;
use needlereq_core::db::open_db_in_memory;
use needlereq_core::{
    Category, Granularity, NewRequisition, RequisitionRepository, SqliteRequisitionRepository,
    StoreError, Subcategory, ValidationError,
};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn requisition(quantity: u32, category: Category, day: &str) -> NewRequisition {
    NewRequisition::new(quantity, category, Subcategory::Alto, date(day))
}

#[test]
fn insert_then_list_recent_returns_inserted_values() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    let first = repo
        .insert(&requisition(3, Category::Neetex, "2023-01-10"))
        .unwrap();
    let inserted = NewRequisition::new(5, Category::GrozBeckert, Subcategory::Baixo, date("2022-03-15"));
    let second = repo.insert(&inserted).unwrap();
    assert!(second > first);

    let recent = repo.list_recent(1).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, second);
    assert_eq!(recent[0].to_new(), inserted);
}

#[test]
fn list_recent_is_descending_by_id_and_capped() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    let ids: Vec<i64> = (1..=5)
        .map(|quantity| {
            repo.insert(&requisition(quantity, Category::Neetex, "2023-01-01"))
                .unwrap()
        })
        .collect();

    let recent = repo.list_recent(3).unwrap();
    let recent_ids: Vec<i64> = recent.iter().map(|event| event.id).collect();
    assert_eq!(recent_ids, vec![ids[4], ids[3], ids[2]]);
}

#[test]
fn delete_removes_only_matching_row_and_ignores_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    let keep = repo
        .insert(&requisition(1, Category::Neetex, "2023-01-01"))
        .unwrap();
    let drop_id = repo
        .insert(&requisition(2, Category::Neetex, "2023-01-02"))
        .unwrap();

    assert!(repo.delete_by_id(drop_id).unwrap());
    assert!(!repo.delete_by_id(drop_id).unwrap());
    assert!(!repo.delete_by_id(9_999).unwrap());

    let remaining: Vec<i64> = repo
        .list_recent(10)
        .unwrap()
        .into_iter()
        .map(|event| event.id)
        .collect();
    assert_eq!(remaining, vec![keep]);
}

#[test]
fn insert_rejects_zero_quantity_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    let err = repo
        .insert(&requisition(0, Category::Neetex, "2023-01-01"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidQuantity(_))
    ));
    assert!(repo.list_recent(10).unwrap().is_empty());
}

#[test]
fn insert_batch_is_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    let batch = vec![
        requisition(1, Category::Neetex, "2023-01-01"),
        requisition(0, Category::Neetex, "2023-01-02"),
    ];
    assert!(repo.insert_batch(&batch).is_err());
    assert!(repo.list_recent(10).unwrap().is_empty());

    let batch = vec![
        requisition(1, Category::Neetex, "2023-01-01"),
        requisition(2, Category::GrozBeckert, "2023-01-02"),
    ];
    assert_eq!(repo.insert_batch(&batch).unwrap(), 2);
    assert_eq!(repo.list_recent(10).unwrap().len(), 2);
}

#[test]
fn sum_by_period_groups_per_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    repo.insert(&requisition(10, Category::Neetex, "2021-06-01"))
        .unwrap();
    repo.insert(&requisition(20, Category::Neetex, "2021-07-01"))
        .unwrap();
    repo.insert(&requisition(30, Category::Neetex, "2022-01-01"))
        .unwrap();
    repo.insert(&requisition(99, Category::GrozBeckert, "2021-06-15"))
        .unwrap();

    let yearly: Vec<(String, i64)> = repo
        .sum_by_period(Category::Neetex, Granularity::Yearly)
        .unwrap()
        .into_iter()
        .map(|row| (row.period.to_string(), row.total))
        .collect();
    assert_eq!(
        yearly,
        vec![("2021".to_string(), 30), ("2022".to_string(), 30)]
    );

    let monthly: Vec<(String, i64)> = repo
        .sum_by_period(Category::Neetex, Granularity::Monthly)
        .unwrap()
        .into_iter()
        .map(|row| (row.period.to_string(), row.total))
        .collect();
    assert_eq!(
        monthly,
        vec![
            ("2021-06".to_string(), 10),
            ("2021-07".to_string(), 20),
            ("2022-01".to_string(), 30),
        ]
    );
}

#[test]
fn sum_by_period_skips_rows_without_usable_date() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO requisicoes (quantidade, tipo, talao, data) VALUES
            (4, 'Neetex', 'Alto', NULL),
            (6, 'Neetex', 'Alto', 'not a date'),
            (8, 'Neetex', 'Baixo', '2020-02-02 00:00:00');",
    )
    .unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    let totals = repo
        .sum_by_period(Category::Neetex, Granularity::Yearly)
        .unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].period.as_str(), "2020");
    assert_eq!(totals[0].total, 8);
}

#[test]
fn list_recent_skips_undecodable_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO requisicoes (quantidade, tipo, talao, data) VALUES
            (3, 'Neetex', 'Alto', '2020-02-01'),
            ('lots', 'Neetex', 'Alto', '2020-02-02'),
            (4, 7, 'Alto', '2020-02-03'),
            (5, 'Neetex', 'Baixo', '2020-02-04');",
    )
    .unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    let quantities: Vec<u32> = repo
        .list_recent(10)
        .unwrap()
        .into_iter()
        .map(|event| event.quantity)
        .collect();
    assert_eq!(quantities, vec![5, 3]);
}

#[test]
fn sum_by_period_ignores_non_integer_quantities() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO requisicoes (quantidade, tipo, talao, data) VALUES
            (5, 'Neetex', 'Alto', '2021-06-01'),
            ('2.5', 'Neetex', 'Alto', '2021-07-01'),
            ('dez', 'Neetex', 'Alto', '2021-07-01'),
            (2.5, 'Neetex', 'Alto', '2022-01-01');",
    )
    .unwrap();
    let repo = SqliteRequisitionRepository::new(&conn);

    let totals: Vec<(String, i64)> = repo
        .sum_by_period(Category::Neetex, Granularity::Yearly)
        .unwrap()
        .into_iter()
        .map(|row| (row.period.to_string(), row.total))
        .collect();
    assert_eq!(
        totals,
        vec![("2021".to_string(), 5), ("2022".to_string(), 0)]
    );
}
