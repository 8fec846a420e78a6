use yamlpipe::command::{execute, Session, YamlCommand};
use yamlpipe::document::node::YamlValue;
use yamlpipe::document::parser::parse_yaml;
use yamlpipe::processor::{InsertProcessor, ListProcessor, ReadProcessor, ReplaceProcessor};
use yamlpipe::yamlpath::{Matcher, YamlPath};

const PETSTORE: &str = r#"
paths:
  /pet:
    put:
      responses:
        "200":
          description: ok
"#;

fn run(line: &str, doc: &YamlValue) -> YamlValue {
    let command = YamlCommand::parse_line(line).unwrap();
    execute(&command, doc.clone(), &mut Session::default()).unwrap()
}

#[test]
fn test_petstore_read_list_delete_insert() {
    let doc = parse_yaml(PETSTORE).unwrap();
    let path = "paths.*.*.responses.200.description";

    assert_eq!(run(&format!("read {}", path), &doc), parse_yaml("[ok]").unwrap());
    assert_eq!(
        run(&format!("list {}", path), &doc),
        parse_yaml("['paths./pet.put.responses.200.description']").unwrap()
    );

    let deleted = run(&format!("delete {}", path), &doc);
    assert_eq!(
        deleted,
        parse_yaml("paths:\n  /pet:\n    put:\n      responses:\n        '200': {}\n").unwrap()
    );

    let inserted = run("insert paths.*.*.responses.404 '{\"x\": 1}'", &doc);
    let expected = r#"
paths:
  /pet:
    put:
      responses:
        "200":
          description: ok
        "404":
          x: 1
"#;
    assert_eq!(inserted, parse_yaml(expected).unwrap());
}

#[test]
fn test_every_full_match_visited_once() {
    let doc = r#"
a:
  x:
    leaf: 1
  y:
    leaf: {nested: true}
  z:
    leaf: [1, 2]
b:
  x:
    leaf: 4
"#;
    let mut doc = parse_yaml(doc).unwrap();
    let pattern = YamlPath::parse("*.*.leaf", ".").unwrap();
    let mut lister = ListProcessor::new();
    assert!(Matcher::new(&mut lister).run(&mut doc, &pattern).unwrap());
    assert_eq!(lister.paths(), &["a.x.leaf", "a.y.leaf", "a.z.leaf", "b.x.leaf"]);
}

#[test]
fn test_replace_produces_independent_copies() {
    let mut doc = parse_yaml("a: 1\nb: 2\nc: 3\n").unwrap();
    let pattern = YamlPath::parse("a|b", ".").unwrap();
    let mut replacer = ReplaceProcessor::new(parse_yaml("{list: [1]}").unwrap());
    Matcher::new(&mut replacer).run(&mut doc, &pattern).unwrap();
    assert_eq!(replacer.replaced(), 2);

    let map = doc.as_object_mut().unwrap();
    if let Some(YamlValue::Object(inner)) = map.get_mut("a") {
        inner.insert("extra".to_string(), YamlValue::from(true));
    }
    assert_eq!(map["b"], parse_yaml("{list: [1]}").unwrap());
    assert_eq!(map["c"], YamlValue::from(3));
}

#[test]
fn test_insert_creates_exactly_one_branch_per_missing_site() {
    let doc = r#"
services:
  web:
    ports: [80]
  db:
    image: postgres
  cache:
    image: redis
    labels:
      tier: cache
"#;
    let mut doc = parse_yaml(doc).unwrap();
    let pattern = YamlPath::parse("services.*.labels.owner", ".").unwrap();
    let mut inserter = InsertProcessor::new(YamlValue::from("ops"));
    Matcher::new(&mut inserter).run(&mut doc, &pattern).unwrap();

    // cache already has labels, so only its owner key is missing; that is
    // the deepest miss and the only branch created
    assert_eq!(inserter.created(), 1);
    let mut reader = ReadProcessor::new();
    let owners = YamlPath::parse("services.*.labels.owner", ".").unwrap();
    Matcher::new(&mut reader).run(&mut doc, &owners).unwrap();
    assert_eq!(reader.values(), &[YamlValue::from("ops")]);

    let untouched = parse_yaml("ports: [80]").unwrap();
    assert_eq!(doc.as_object().unwrap()["services"].as_object().unwrap()["web"], untouched);
}

#[test]
fn test_custom_delimiter_with_dotted_keys() {
    let doc = parse_yaml("servers:\n  api.example.com:\n    port: 443\n").unwrap();
    assert_eq!(
        run("read -d / 'servers/api\\.example\\.com/port'", &doc),
        parse_yaml("[443]").unwrap()
    );
    assert_eq!(
        run("insert -d / 'servers/api\\.example\\.com/tls' true", &doc),
        parse_yaml("servers:\n  api.example.com:\n    port: 443\n    tls: true\n").unwrap()
    );
}
