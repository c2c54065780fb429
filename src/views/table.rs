use crate::cache::QueryState;
use crate::views::Templates;
use serde::Serialize;

struct Column<T> {
    header: &'static str,
    cell: fn(&T) -> String,
}

/// A list component: renders a query's state as a loading placeholder, an
/// error, an explicit empty state, or an ordered table of at most `limit` rows.
pub struct TableView<T> {
    title: &'static str,
    columns: Vec<Column<T>>,
    empty_message: &'static str,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct TableModel<'a> {
    title: &'a str,
    status: &'static str,
    message: String,
    columns: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    hidden: usize,
}

impl<T> TableView<T> {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            columns: Vec::new(),
            empty_message: "Nothing here yet.",
            limit: None,
        }
    }

    pub fn column(mut self, header: &'static str, cell: fn(&T) -> String) -> Self {
        self.columns.push(Column { header, cell });
        self
    }

    pub fn empty_message(mut self, message: &'static str) -> Self {
        self.empty_message = message;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn model(&self, state: &QueryState<Vec<T>>) -> TableModel<'_> {
        let mut model = TableModel {
            title: self.title,
            status: "rows",
            message: String::new(),
            columns: self.columns.iter().map(|c| c.header).collect(),
            rows: Vec::new(),
            hidden: 0,
        };
        match state {
            QueryState::Idle | QueryState::Pending => model.status = "loading",
            QueryState::Failed(message) => {
                model.status = "error";
                model.message = message.clone();
            }
            QueryState::Ready(items) if items.is_empty() => {
                model.status = "empty";
                model.message = self.empty_message.to_string();
            }
            QueryState::Ready(items) => {
                let shown = self.limit.unwrap_or(items.len()).min(items.len());
                model.rows = items[..shown]
                    .iter()
                    .map(|item| self.columns.iter().map(|c| (c.cell)(item)).collect())
                    .collect();
                model.hidden = items.len() - shown;
            }
        }
        model
    }

    pub fn render(
        &self,
        templates: &Templates,
        state: &QueryState<Vec<T>>,
    ) -> Result<String, tera::Error> {
        templates.render("table.html", &self.model(state))
    }
}
