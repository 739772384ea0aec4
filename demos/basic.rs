use axum::http::Method;
use json_items::{dispatch, FileStore, Items, Request};

fn main() -> Result<(), json_items::Error> {
    let path = std::env::temp_dir().join("json_items_example_basic.json");
    let _ = std::fs::remove_file(&path);
    let items = Items::new(FileStore::open(&path)?);

    let show = |label: &str, req: Request| {
        let reply = dispatch(&items, &req);
        println!("{label:<8} {} {}", reply.status, String::from_utf8_lossy(&reply.body));
    };

    // create / update / delete / read
    show("create", Request::new(Method::POST, "/items", r#"{"name":"apples","qty":3}"#));
    show("create", Request::new(Method::POST, "/items", r#"{"name":"bananas","qty":5}"#));
    show("update", Request::new(Method::PUT, "/items", r#"{"id":1,"qty":4}"#));
    show("delete", Request::new(Method::DELETE, "/items?id=2", ""));
    show("read", Request::new(Method::GET, "/items", ""));

    // misses
    show("update", Request::new(Method::PUT, "/items", r#"{"id":9}"#));
    show("other", Request::new(Method::GET, "/", ""));

    let _ = std::fs::remove_file(&path);
    Ok(())
}
