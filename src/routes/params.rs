use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
    Likes,
}

/// Page fields are inlined rather than flattened: urlencoded numbers do not
/// survive `#[serde(flatten)]`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        let p = Pagination {
            page: Some(3),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (3, 100, 200));
        let p = Pagination {
            page: Some(-2),
            per_page: Some(0),
        };
        assert_eq!(p.normalize(), (1, 1, 0));
    }

    #[test]
    fn huge_page_does_not_overflow_offset() {
        let p = Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        };
        assert_eq!(p.normalize(), (i64::MAX, 100, i64::MAX));

        let uri: axum::http::Uri = "/api/products?page=9223372036854775807".parse().unwrap();
        let axum::extract::Query(q) = axum::extract::Query::<ProductQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(q.pagination().normalize(), (i64::MAX, 20, i64::MAX));
    }

    #[test]
    fn product_query_reads_urlencoded_numbers() {
        let uri: axum::http::Uri = "/api/products?page=2&per_page=5&category=fashion&sort_by=price"
            .parse()
            .unwrap();
        let axum::extract::Query(q) = axum::extract::Query::<ProductQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(q.pagination().normalize(), (2, 5, 5));
        assert_eq!(q.category.as_deref(), Some("fashion"));
        assert!(matches!(q.sort_by, Some(ProductSortBy::Price)));
    }
}
