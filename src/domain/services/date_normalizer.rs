// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, NaiveDateTime};

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 将微博页面上的发布时间转换为 `YYYY-MM-DD HH:MM`
///
/// 支持 "刚刚"、"N秒前"、"N分钟前"、"N小时前"、"今天HH:MM"、"MM月DD日 HH:MM"
/// 和 "YYYY年MM月DD日 HH:MM"。无法识别的输入原样返回。
pub fn standardize_date(raw: &str, now: NaiveDateTime) -> String {
    let cleaned: String = raw.chars().filter(|c| *c != ' ' && *c != '\n').collect();
    let created_at = cleaned.split('前').next().unwrap_or_default();

    if created_at.contains("刚刚") {
        return now.format(OUTPUT_FORMAT).to_string();
    }

    for (unit, to_duration) in [
        ("秒", Duration::try_seconds as fn(i64) -> Option<Duration>),
        ("分钟", Duration::try_minutes),
        ("小时", Duration::try_hours),
    ] {
        if let Some(pos) = created_at.find(unit) {
            return created_at[..pos]
                .parse::<i64>()
                .ok()
                .and_then(to_duration)
                .and_then(|delta| now.checked_sub_signed(delta))
                .map(|at| at.format(OUTPUT_FORMAT).to_string())
                .unwrap_or_else(|| created_at.to_string());
        }
    }

    let chars: Vec<char> = created_at.chars().collect();
    let slice = |from: usize, to: usize| -> String {
        chars.iter().skip(from).take(to.saturating_sub(from)).collect()
    };

    if created_at.contains("今天") {
        format!("{} {}", now.format("%Y-%m-%d"), slice(2, chars.len()))
    } else if !created_at.contains('年') {
        if chars.len() < 6 {
            return created_at.to_string();
        }
        format!(
            "{}-{}-{} {}",
            now.format("%Y"),
            slice(0, 2),
            slice(3, 5),
            slice(6, chars.len())
        )
    } else {
        if chars.len() < 11 {
            return created_at.to_string();
        }
        format!(
            "{}-{}-{} {}",
            slice(0, 4),
            slice(5, 7),
            slice(8, 10),
            slice(11, chars.len())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 28)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_just_now() {
        assert_eq!(standardize_date("刚刚", now()), "2025-10-28 12:30");
    }

    #[test]
    fn test_relative_units() {
        assert_eq!(standardize_date("30秒前", now()), "2025-10-28 12:29");
        assert_eq!(standardize_date("5分钟前", now()), "2025-10-28 12:25");
        assert_eq!(standardize_date(" 13小时前\n", now()), "2025-10-27 23:30");
    }

    #[test]
    fn test_today() {
        assert_eq!(standardize_date("今天 08:05", now()), "2025-10-28 08:05");
    }

    #[test]
    fn test_month_day_of_current_year() {
        assert_eq!(standardize_date("10月27日 14:30", now()), "2025-10-27 14:30");
    }

    #[test]
    fn test_full_date() {
        assert_eq!(
            standardize_date("2024年03月01日 09:15", now()),
            "2024-03-01 09:15"
        );
    }

    #[test]
    fn test_unrecognized_input_is_kept() {
        assert_eq!(standardize_date("昨天", now()), "昨天");
        assert_eq!(standardize_date("几分钟前", now()), "几分钟");
    }

    #[test]
    fn test_out_of_range_offset_is_kept() {
        assert_eq!(
            standardize_date("99999999999小时前", now()),
            "99999999999小时"
        );
        assert_eq!(
            standardize_date("99999999999999999999秒前", now()),
            "99999999999999999999秒"
        );
    }
}
