//! End-to-end compilation of compact-syntax documents to RELAX NG XML

use rnc2rng::rnc::{compile, CompileError, ErrorCategory};
use rstest::rstest;

#[test]
fn test_single_element() {
    let xml = compile("element foo { text }").unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<element name="foo" xmlns="http://relaxng.org/ns/structure/1.0">
  <text/>
</element>
"#);
}

#[test]
fn test_start_with_default_namespace() {
    let xml =
        compile("default namespace = \"http://example.com\"\nstart = element root { empty }\n")
            .unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<grammar xmlns="http://relaxng.org/ns/structure/1.0"
    ns="http://example.com">
  <start>
    <element name="root">
      <empty/>
    </element>
  </start>
</grammar>
"#);
}

#[test]
fn test_adjacent_documentation_lines_merge() {
    let xml = compile("## first\n## second\nfoo = element x { text }\n").unwrap();
    assert_eq!(xml.matches("<a:documentation>").count(), 1);
    assert!(xml.contains("<a:documentation>first\nsecond</a:documentation>"));
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<define name="foo" xmlns="http://relaxng.org/ns/structure/1.0"
    xmlns:a="http://relaxng.org/ns/compatibility/annotations/1.0">
  <element name="x">
    <a:documentation>first
second</a:documentation>
    <text/>
  </element>
</define>
"#);
}

#[test]
fn test_choice_definition() {
    let xml = compile("foo = element a { text } | element b { text }\n").unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<define name="foo" xmlns="http://relaxng.org/ns/structure/1.0">
  <choice>
    <element name="a">
      <text/>
    </element>
    <element name="b">
      <text/>
    </element>
  </choice>
</define>
"#);
}

#[test]
fn test_grammar_with_declarations() {
    let source = r#"namespace ex = "urn:example"
datatypes xsd = "http://www.w3.org/2001/XMLSchema-datatypes"

start = doc

# A document
doc = element doc {
  attribute version { text }?,
  item*
}

## An item
item = element item { xsd:string { pattern = "[a-z]+" } }
"#;
    let xml = compile(source).unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<grammar xmlns="http://relaxng.org/ns/structure/1.0"
    datatypeLibrary="http://www.w3.org/2001/XMLSchema-datatypes"
    xmlns:a="http://relaxng.org/ns/compatibility/annotations/1.0"
    xmlns:ex="urn:example">
  <start>
    <ref name="doc"/>
  </start>
  <!-- A document -->
  <define name="doc">
    <element name="doc">
      <group>
        <optional>
          <attribute name="version"/>
        </optional>
        <zeroOrMore>
          <ref name="item"/>
        </zeroOrMore>
      </group>
    </element>
  </define>
  <define name="item">
    <element name="item">
      <a:documentation>An item</a:documentation>
      <data type="string">
        <param name="pattern">[a-z]+</param>
      </data>
    </element>
  </define>
</grammar>
"#);
}

#[test]
fn test_name_class_and_quantified_group() {
    let xml = compile("start = element a | b { ( text | empty )* }\n").unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<grammar xmlns="http://relaxng.org/ns/structure/1.0">
  <start>
    <element>
      <choice>
        <name>a</name>
        <name>b</name>
      </choice>
      <zeroOrMore>
        <choice>
          <text/>
          <empty/>
        </choice>
      </zeroOrMore>
    </element>
  </start>
</grammar>
"#);
}

#[test]
fn test_annotation_attributes_and_builtin_datatypes() {
    let source = "namespace x = \"urn:x\"\nfoo = [ x:size = \"10\" ] element e { token, string, \"a < b\" }\n";
    let xml = compile(source).unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<define name="foo" xmlns="http://relaxng.org/ns/structure/1.0"
    xmlns:x="urn:x">
  <element name="e" x:size="10">
    <group>
      <data type="token" datatypeLibrary=""/>
      <data type="string" datatypeLibrary=""/>
      <value>a &lt; b</value>
    </group>
  </element>
</define>
"#);
}

#[test]
fn test_mixed_list_and_include() {
    let source = "include \"common.rnc\"\nfoo = mixed { element b { text }* }\nbar = list { token+ }\n";
    let xml = compile(source).unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<grammar xmlns="http://relaxng.org/ns/structure/1.0">
  <include href="common.rnc"/>
  <define name="foo">
    <mixed>
      <zeroOrMore>
        <element name="b">
          <text/>
        </element>
      </zeroOrMore>
    </mixed>
  </define>
  <define name="bar">
    <list>
      <oneOrMore>
        <data type="token" datatypeLibrary=""/>
      </oneOrMore>
    </list>
  </define>
</grammar>
"#);
}

#[test]
fn test_quantified_datatype() {
    let xml = compile("element a { xsd:string { pattern = \"[a-z]+\" }* }").unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<element name="a" xmlns="http://relaxng.org/ns/structure/1.0"
    datatypeLibrary="http://www.w3.org/2001/XMLSchema-datatypes">
  <zeroOrMore>
    <data type="string">
      <param name="pattern">[a-z]+</param>
    </data>
  </zeroOrMore>
</element>
"#);
}

#[test]
fn test_quantified_group() {
    let xml = compile("foo = element x { ( a, b )+ }
").unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<define name="foo" xmlns="http://relaxng.org/ns/structure/1.0">
  <element name="x">
    <oneOrMore>
      <group>
        <ref name="a"/>
        <ref name="b"/>
      </group>
    </oneOrMore>
  </element>
</define>
"#);
}

#[test]
fn test_top_level_choice() {
    let xml = compile("element a { text } | element b { empty }").unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<choice xmlns="http://relaxng.org/ns/structure/1.0">
  <element name="a">
    <text/>
  </element>
  <element name="b">
    <empty/>
  </element>
</choice>
"#);
}

#[test]
fn test_definitions_without_start_have_one_root() {
    let xml = compile("a = element a { b }
b = element b { text }
").unwrap();
    assert!(xml.starts_with(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<grammar xmlns="
    ));
    assert!(xml.ends_with("</grammar>"));
    assert_eq!(xml.lines().filter(|line| line.starts_with('<')).count(), 3);
}

#[test]
fn test_crlf_and_bom_input() {
    let unix = compile("foo = element a { text }\n").unwrap();
    let windows = compile("\u{FEFF}foo = element a { text }\r\n").unwrap();
    assert_eq!(unix, windows);
}

#[test]
fn test_unknown_characters_are_ignored() {
    let clean = compile("element foo { text }").unwrap();
    let noisy = compile("element foo ; { text } %").unwrap();
    assert_eq!(clean, noisy);
}

#[rstest]
#[case("element foo { text", ErrorCategory::Syntax, "Unbalanced delimiter '{' at byte 12")]
#[case("foo = a )\n", ErrorCategory::Syntax, "Unbalanced delimiter ')'")]
#[case("foo = a, b | c\n", ErrorCategory::Syntax, "Ambiguity in sequencing")]
#[case("foo = element x { | text }\n", ErrorCategory::Syntax, "has no left operand")]
#[case(
    "foo = [ x = \"1\" x = \"2\" ] element y { empty }\n",
    ErrorCategory::Syntax,
    "Redefinition of annotation attribute 'x'"
)]
#[case(
    "foo = [ \"v\" ] element y { empty }\n",
    ErrorCategory::Syntax,
    "Malformed annotation block"
)]
#[case("namespace ex \"urn:x\"\n", ErrorCategory::Syntax, "Malformed namespace declaration")]
#[case("foo = attribute a | b { text }\n", ErrorCategory::Internal, "Internal compiler error")]
fn test_compile_errors(
    #[case] source: &str,
    #[case] category: ErrorCategory,
    #[case] message: &str,
) {
    let err: CompileError = compile(source).unwrap_err();
    assert_eq!(err.category(), category);
    assert!(
        err.to_string().contains(message),
        "unexpected message: {}",
        err
    );
}
