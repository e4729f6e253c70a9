use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer,
};

use super::FromSqliteRow;
use crate::dates::parse_date;
use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            description: row.get("description")?,
            duration: row.get("duration")?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Deserialize a scalar field as text.
///
/// Form bodies carry every value as a string while JSON clients may send
/// `"duration": 30`, so numbers are accepted and kept in their textual form.
fn deserialize_optional_scalar<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, d: D) -> std::result::Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            d.deserialize_any(ScalarVisitor)
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

/// Treats a missing or blank value as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_date_field(name: &str, value: Option<String>) -> Result<Option<NaiveDate>> {
    non_blank(value)
        .map(|s| {
            parse_date(&s)
                .ok_or_else(|| AppError::Validation(format!("{} is not a valid date: {}", name, s)))
        })
        .transpose()
}

/// Raw body of an add-exercise request.
#[derive(Debug, Default, Deserialize)]
pub struct CreateExercise {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    pub date: Option<String>,
}

/// A validated exercise ready to be stored. `date` is `None` when the client
/// left it out and the current date applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub description: String,
    pub duration: i64,
    pub date: Option<NaiveDate>,
}

impl CreateExercise {
    pub fn validate(self) -> Result<NewExercise> {
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("description is required".to_string()));
        }

        let duration = non_blank(self.duration)
            .ok_or_else(|| AppError::Validation("duration is required".to_string()))?;
        let duration = duration.trim().parse::<i64>().map_err(|_| {
            AppError::Validation(format!("duration must be a whole number: {}", duration))
        })?;

        let date = parse_date_field("date", self.date)?;

        Ok(NewExercise {
            description: self.description,
            duration,
            date,
        })
    }
}

/// Raw query string of a log request.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

/// Bounds are inclusive and independently optional. A `limit` of zero means
/// no cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl LogQuery {
    pub fn validate(self) -> Result<LogFilter> {
        let from = parse_date_field("from", self.from)?;
        let to = parse_date_field("to", self.to)?;

        let limit = non_blank(self.limit)
            .map(|s| {
                s.trim().parse::<u32>().map_err(|_| {
                    AppError::Validation(format!("limit must be a non-negative integer: {}", s))
                })
            })
            .transpose()?
            .filter(|&n| n > 0);

        Ok(LogFilter { from, to, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_exercise_from_json_number() {
        let input: CreateExercise =
            serde_json::from_str(r#"{"description":"run","duration":30}"#).unwrap();
        let exercise = input.validate().unwrap();

        assert_eq!(exercise.duration, 30);
        assert_eq!(exercise.date, None);
    }

    #[test]
    fn test_create_exercise_from_json_strings() {
        let input: CreateExercise = serde_json::from_str(
            r#"{"description":"test run","duration":"30","date":"2023-01-15"}"#,
        )
        .unwrap();

        assert_eq!(
            input.validate().unwrap(),
            NewExercise {
                description: "test run".to_string(),
                duration: 30,
                date: Some(date(2023, 1, 15)),
            }
        );
    }

    #[test]
    fn test_create_exercise_null_date_is_absent() {
        let input: CreateExercise =
            serde_json::from_str(r#"{"description":"run","duration":"5","date":null}"#).unwrap();
        assert_eq!(input.validate().unwrap().date, None);
    }

    #[test]
    fn test_create_exercise_empty_date_is_absent() {
        let input = CreateExercise {
            description: "run".to_string(),
            duration: Some("5".to_string()),
            date: Some(String::new()),
        };
        assert_eq!(input.validate().unwrap().date, None);
    }

    #[test]
    fn test_create_exercise_requires_description() {
        let input = CreateExercise {
            description: " ".to_string(),
            duration: Some("5".to_string()),
            date: None,
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_exercise_rejects_bad_duration() {
        for raw in [None, Some("abc"), Some("30.5"), Some("")] {
            let input = CreateExercise {
                description: "run".to_string(),
                duration: raw.map(str::to_string),
                date: None,
            };
            assert!(
                matches!(input.validate(), Err(AppError::Validation(_))),
                "duration {:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_create_exercise_rejects_bad_date() {
        let input = CreateExercise {
            description: "run".to_string(),
            duration: Some("5".to_string()),
            date: Some("someday".to_string()),
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "date is not a valid date: someday");
    }

    #[test]
    fn test_log_query_empty() {
        assert_eq!(LogQuery::default().validate().unwrap(), LogFilter::default());
    }

    #[test]
    fn test_log_query_bounds_and_limit() {
        let query = LogQuery {
            from: Some("2023-01-01".to_string()),
            to: Some("2023-01-31".to_string()),
            limit: Some("3".to_string()),
        };
        assert_eq!(
            query.validate().unwrap(),
            LogFilter {
                from: Some(date(2023, 1, 1)),
                to: Some(date(2023, 1, 31)),
                limit: Some(3),
            }
        );
    }

    #[test]
    fn test_log_query_zero_limit_means_unlimited() {
        let query = LogQuery {
            limit: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(query.validate().unwrap().limit, None);
    }

    #[test]
    fn test_log_query_rejects_invalid_values() {
        let bad_limit = LogQuery {
            limit: Some("-1".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_limit.validate(), Err(AppError::Validation(_))));

        let bad_from = LogQuery {
            from: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_from.validate(), Err(AppError::Validation(_))));
    }
}
