//! Canonical month tables.
//!
//! Aggregated views enumerate these tables rather than the months observed
//! in the data, so months with zero issues still appear in calendar order.

/// Full month names, used by the edition detail view.
pub const MONTHS: [(u8, &str); 12] = [
    (1, "Январь"),
    (2, "Февраль"),
    (3, "Март"),
    (4, "Апрель"),
    (5, "Май"),
    (6, "Июнь"),
    (7, "Июль"),
    (8, "Август"),
    (9, "Сентябрь"),
    (10, "Октябрь"),
    (11, "Ноябрь"),
    (12, "Декабрь"),
];

/// Short month names, used by the year archive view.
pub const SHORT_MONTHS: [(u8, &str); 12] = [
    (1, "Янв"),
    (2, "Фев"),
    (3, "Мар"),
    (4, "Апр"),
    (5, "Май"),
    (6, "Июн"),
    (7, "Июл"),
    (8, "Авг"),
    (9, "Сен"),
    (10, "Окт"),
    (11, "Ноя"),
    (12, "Дек"),
];
