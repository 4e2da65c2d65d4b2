//! "Excel" export: an HTML table inside a document carrying the Office
//! namespaces and the conditional `x:ExcelWorkbook` block, which Excel opens
//! as a worksheet. It is not a binary workbook.

use evd_core::EvidenceItem;

use crate::column::ColumnKey;

pub const WORKSHEET_NAME: &str = "Evidence";

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn to_excel_html(records: &[&EvidenceItem], columns: &[ColumnKey]) -> String {
    let mut table = String::from("<table border=\"1\">\n<thead>\n<tr>");
    for column in columns {
        table.push_str(&format!("<th>{}</th>", html_escape(column.label())));
    }
    table.push_str("</tr>\n</thead>\n<tbody>\n");
    for record in records {
        table.push_str("<tr>");
        for column in columns {
            table.push_str(&format!("<td>{}</td>", html_escape(&column.extract(record))));
        }
        table.push_str("</tr>\n");
    }
    table.push_str("</tbody>\n</table>");

    format!(
        r#"<html xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:x="urn:schemas-microsoft-com:office:excel" xmlns="http://www.w3.org/TR/REC-html40">
<head>
<meta charset="UTF-8">
<!--[if gte mso 9]><xml><x:ExcelWorkbook><x:ExcelWorksheets><x:ExcelWorksheet><x:Name>{WORKSHEET_NAME}</x:Name><x:WorksheetOptions><x:DisplayGridlines/></x:WorksheetOptions></x:ExcelWorksheet></x:ExcelWorksheets></x:ExcelWorkbook></xml><![endif]-->
</head>
<body>
{table}
</body>
</html>"#
    )
}
