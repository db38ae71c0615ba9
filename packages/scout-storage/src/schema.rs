pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_boards.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_boards.sql")),
				"tables/002_boards_followed.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_boards_followed.sql")),
				"tables/003_search_results.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_search_results.sql")),
				"tables/004_connections.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_connections.sql")),
				"tables/005_search_history.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_search_history.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
