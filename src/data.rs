//! The built-in language table
//!
//! Order matters: lookups return the first match, so an earlier entry wins
//! extensions it shares with a later one.

use crate::description::{of, of_legacy, LanguageDescription, LanguageSpec};
use crate::error::ConfigError;
use crate::loader::Loader;

/// SQL in the given dialect
fn sql(dialect: &str) -> Loader {
    Loader::factory("tree-sitter-sql", "sql").option("dialect", dialect)
}

/// `export` from the legacy mode file `file`
fn mode(file: &str, export: &str) -> Loader {
    Loader::legacy(format!("legacy-modes/mode/{file}"), export)
}

fn javascript(jsx: bool, typescript: bool) -> Loader {
    let loader = Loader::factory("tree-sitter-javascript", "javascript");
    let loader = if jsx { loader.option("jsx", true) } else { loader };
    if typescript {
        loader.option("typescript", true)
    } else {
        loader
    }
}

fn spec(name: &str) -> LanguageSpec {
    LanguageSpec::new(name)
}

/// Every built-in language, in lookup order
pub fn languages() -> Result<Vec<LanguageDescription>, ConfigError> {
    Ok(vec![
        // Grammar-backed languages
        of(spec("C")
            .extensions(["c", "h", "ino"])
            .module("tree-sitter-cpp")
            .load_name("cpp"))?,
        of(spec("C++")
            .aliases(["cpp"])
            .extensions(["cpp", "c++", "cc", "cxx", "hpp", "h++", "hh", "hxx"])
            .module("tree-sitter-cpp")
            .load_name("cpp"))?,
        of(spec("CQL")
            .aliases(["cassandra"])
            .extensions(["cql"])
            .module("tree-sitter-sql")
            .loader(sql("Cassandra")))?,
        of(spec("CSS").extensions(["css"]))?,
        of(spec("Go").extensions(["go"]))?,
        of(spec("HTML")
            .aliases(["xhtml"])
            .extensions(["html", "htm", "handlebars", "hbs"]))?,
        of(spec("Java").extensions(["java"]))?,
        of(spec("JavaScript")
            .aliases(["ecmascript", "js", "node"])
            .extensions(["js", "mjs", "cjs"]))?,
        of(spec("JSON").aliases(["json5"]).extensions(["json", "map"]))?,
        of(spec("JSX")
            .extensions(["jsx"])
            .module("tree-sitter-javascript")
            .loader(javascript(true, false)))?,
        of(spec("LESS").extensions(["less"]))?,
        of(spec("Liquid").extensions(["liquid"]))?,
        of(spec("MariaDB SQL")
            .module("tree-sitter-sql")
            .loader(sql("MariaSQL")))?,
        of(spec("Markdown").extensions(["md", "markdown", "mkd"]))?,
        of(spec("MS SQL").module("tree-sitter-sql").loader(sql("MSSQL")))?,
        of(spec("MySQL").module("tree-sitter-sql").loader(sql("MySQL")))?,
        of(spec("PHP").extensions(["php", "php3", "php4", "php5", "php7", "phtml"]))?,
        of(spec("PLSQL")
            .extensions(["pls"])
            .module("tree-sitter-sql")
            .loader(sql("PLSQL")))?,
        of(spec("PostgreSQL")
            .module("tree-sitter-sql")
            .loader(sql("PostgreSQL")))?,
        of(spec("Python")
            .extensions(["BUILD", "bzl", "py", "pyw"])
            .filename("^(BUCK|BUILD)$"))?,
        of(spec("Rust").extensions(["rs"]))?,
        of(spec("Sass").extensions(["sass"]))?,
        of(spec("SCSS")
            .extensions(["scss"])
            .module("tree-sitter-sass")
            .load_name("sass"))?,
        of(spec("SQL")
            .extensions(["sql"])
            .module("tree-sitter-sql")
            .loader(sql("StandardSQL")))?,
        of(spec("SQLite").module("tree-sitter-sql").loader(sql("SQLite")))?,
        of(spec("TSX")
            .extensions(["tsx"])
            .module("tree-sitter-javascript")
            .loader(javascript(true, true)))?,
        of(spec("TypeScript")
            .aliases(["ts"])
            .extensions(["ts", "mts", "cts"])
            .module("tree-sitter-javascript")
            .loader(javascript(false, true)))?,
        of(spec("WebAssembly")
            .extensions(["wat", "wast"])
            .module("tree-sitter-wast")
            .load_name("wast"))?,
        of(spec("XML")
            .aliases(["rss", "wsdl", "xsd"])
            .extensions(["xml", "xsl", "xsd", "svg"]))?,
        of(spec("YAML").aliases(["yml"]).extensions(["yaml", "yml"]))?,
        // Legacy stream modes
        of_legacy(spec("APL").extensions(["dyalog", "apl"]))?,
        of_legacy(spec("PGP")
            .aliases(["asciiarmor"])
            .extensions(["asc", "pgp", "sig"])
            .load_name("asciiArmor"))?,
        of_legacy(spec("ASN.1").extensions(["asn", "asn1"]).load_name("asn1"))?,
        of_legacy(spec("Asterisk").filename(r"(?i)^extensions\.conf$"))?,
        of_legacy(spec("Brainfuck").extensions(["b", "bf"]))?,
        of_legacy(spec("Cobol").extensions(["cob", "cpy"]))?,
        of_legacy(spec("C#")
            .aliases(["csharp", "cs"])
            .extensions(["cs"])
            .loader(mode("clike", "csharp")))?,
        of_legacy(spec("Clojure").extensions(["clj", "cljc", "cljx"]))?,
        of_legacy(spec("ClojureScript")
            .extensions(["cljs"])
            .load_name("clojure"))?,
        of_legacy(spec("Closure Stylesheets (GSS)")
            .extensions(["gss"])
            .loader(mode("css", "gss")))?,
        of_legacy(spec("CMake")
            .extensions(["cmake", "cmake.in"])
            .filename(r"^CMakeLists\.txt$"))?,
        of_legacy(spec("CoffeeScript")
            .aliases(["coffee", "coffee-script"])
            .extensions(["coffee"])
            .load_name("coffeeScript"))?,
        of_legacy(spec("Common Lisp")
            .aliases(["lisp"])
            .extensions(["cl", "lisp", "el"])
            .load_name("commonLisp"))?,
        of_legacy(spec("Cypher").extensions(["cyp", "cypher"]))?,
        of_legacy(spec("Cython")
            .extensions(["pyx", "pxd", "pxi"])
            .loader(mode("python", "cython")))?,
        of_legacy(spec("Crystal").extensions(["cr"]))?,
        of_legacy(spec("D").extensions(["d"]))?,
        of_legacy(spec("Dart")
            .extensions(["dart"])
            .loader(mode("clike", "dart")))?,
        of_legacy(spec("diff").extensions(["diff", "patch"]))?,
        of_legacy(spec("Dockerfile")
            .filename("^Dockerfile$")
            .load_name("dockerFile"))?,
        of_legacy(spec("DTD").extensions(["dtd"]))?,
        of_legacy(spec("Dylan").extensions(["dylan", "dyl", "intr"]))?,
        of_legacy(spec("EBNF"))?,
        of_legacy(spec("ECL").extensions(["ecl"]))?,
        of_legacy(spec("edn")
            .extensions(["edn"])
            .loader(mode("clojure", "clojure")))?,
        of_legacy(spec("Eiffel").extensions(["e"]))?,
        of_legacy(spec("Elm").extensions(["elm"]))?,
        of_legacy(spec("Erlang").extensions(["erl"]))?,
        of_legacy(spec("Esper").loader(mode("sql", "esper")))?,
        of_legacy(spec("Factor").extensions(["factor"]))?,
        of_legacy(spec("FCL"))?,
        of_legacy(spec("Forth").extensions(["forth", "fth", "4th"]))?,
        of_legacy(spec("Fortran").extensions(["f", "for", "f77", "f90", "f95"]))?,
        of_legacy(spec("F#")
            .aliases(["fsharp"])
            .extensions(["fs"])
            .loader(mode("mllike", "fSharp")))?,
        of_legacy(spec("Gas").extensions(["s"]))?,
        of_legacy(spec("Gherkin").extensions(["feature"]))?,
        of_legacy(spec("Groovy")
            .extensions(["groovy", "gradle"])
            .filename("^Jenkinsfile$"))?,
        of_legacy(spec("Haskell").extensions(["hs"]))?,
        of_legacy(spec("Haxe").extensions(["hx"]))?,
        of_legacy(spec("HXML")
            .extensions(["hxml"])
            .loader(mode("haxe", "hxml")))?,
        of_legacy(spec("HTTP"))?,
        of_legacy(spec("IDL").extensions(["pro"]))?,
        of_legacy(spec("JSON-LD")
            .aliases(["jsonld"])
            .extensions(["jsonld"])
            .loader(mode("javascript", "jsonld")))?,
        of_legacy(spec("Jinja2").extensions(["j2", "jinja", "jinja2"]))?,
        of_legacy(spec("Julia").extensions(["jl"]))?,
        of_legacy(spec("Kotlin")
            .extensions(["kt", "kts"])
            .loader(mode("clike", "kotlin")))?,
        of_legacy(spec("LiveScript")
            .aliases(["ls"])
            .extensions(["ls"])
            .load_name("liveScript"))?,
        of_legacy(spec("Lua").extensions(["lua"]))?,
        of_legacy(spec("mIRC").extensions(["mrc"]))?,
        of_legacy(spec("Mathematica").extensions(["m", "nb", "wl", "wls"]))?,
        of_legacy(spec("Modelica").extensions(["mo"]))?,
        of_legacy(spec("MUMPS").extensions(["mps"]))?,
        of_legacy(spec("Mbox").extensions(["mbox"]))?,
        of_legacy(spec("Nginx").filename(r"(?i)nginx.*\.conf$"))?,
        of_legacy(spec("NSIS").extensions(["nsh", "nsi"]))?,
        of_legacy(spec("NTriples").extensions(["nt", "nq"]))?,
        of_legacy(spec("Objective-C")
            .aliases(["objective-c", "objc"])
            .extensions(["m"])
            .loader(mode("clike", "objectiveC")))?,
        of_legacy(spec("Objective-C++")
            .aliases(["objective-c++", "objc++"])
            .extensions(["mm"])
            .loader(mode("clike", "objectiveCpp")))?,
        of_legacy(spec("OCaml")
            .extensions(["ml", "mli", "mll", "mly"])
            .loader(mode("mllike", "oCaml")))?,
        of_legacy(spec("Octave").extensions(["m"]))?,
        of_legacy(spec("Oz").extensions(["oz"]))?,
        of_legacy(spec("Pascal").extensions(["p", "pas"]))?,
        of_legacy(spec("Perl").extensions(["pl", "pm"]))?,
        of_legacy(spec("Pig").extensions(["pig"]))?,
        of_legacy(spec("PowerShell")
            .extensions(["ps1", "psd1", "psm1"])
            .load_name("powerShell"))?,
        of_legacy(spec("Properties files")
            .aliases(["ini", "properties"])
            .extensions(["properties", "ini", "in"])
            .load_name("properties"))?,
        of_legacy(spec("ProtoBuf").extensions(["proto"]))?,
        of_legacy(spec("Pug").aliases(["jade"]).extensions(["pug", "jade"]))?,
        of_legacy(spec("Puppet").extensions(["pp"]))?,
        of_legacy(spec("Q").extensions(["q"]))?,
        of_legacy(spec("R").aliases(["rscript"]).extensions(["r", "R"]))?,
        of_legacy(spec("RPM Changes").loader(mode("rpm", "rpmChanges")))?,
        of_legacy(spec("RPM Spec")
            .extensions(["spec"])
            .loader(mode("rpm", "rpmSpec")))?,
        of_legacy(spec("Ruby")
            .aliases(["jruby", "macruby", "rake", "rb", "rbx"])
            .extensions(["rb"])
            .filename("^(Gemfile|Rakefile)$"))?,
        of_legacy(spec("SAS").extensions(["sas"]))?,
        of_legacy(spec("Scala")
            .extensions(["scala"])
            .loader(mode("clike", "scala")))?,
        of_legacy(spec("Scheme").extensions(["scm", "ss"]))?,
        of_legacy(spec("Shell")
            .aliases(["bash", "sh", "zsh"])
            .extensions(["sh", "ksh", "bash"])
            .filename("^PKGBUILD$"))?,
        of_legacy(spec("Sieve").extensions(["siv", "sieve"]))?,
        of_legacy(spec("Smalltalk").extensions(["st"]))?,
        of_legacy(spec("Solr"))?,
        of_legacy(spec("SML")
            .extensions(["sml", "sig", "fun", "smackspec"])
            .loader(mode("mllike", "sml")))?,
        of_legacy(spec("SPARQL")
            .aliases(["sparul"])
            .extensions(["rq", "sparql"]))?,
        of_legacy(spec("Spreadsheet").aliases(["excel", "formula"]))?,
        of_legacy(spec("Squirrel")
            .extensions(["nut"])
            .loader(mode("clike", "squirrel")))?,
        of_legacy(spec("Stylus").extensions(["styl"]))?,
        of_legacy(spec("Swift").extensions(["swift"]))?,
        of_legacy(spec("sTeX"))?,
        of_legacy(spec("LaTeX")
            .aliases(["tex"])
            .extensions(["text", "ltx", "tex"])
            .load_name("stex"))?,
        of_legacy(spec("SystemVerilog")
            .extensions(["v", "sv", "svh"])
            .load_name("verilog"))?,
        of_legacy(spec("Tcl").extensions(["tcl"]))?,
        of_legacy(spec("Textile").extensions(["textile"]))?,
        of_legacy(spec("TiddlyWiki").load_name("tiddlyWiki"))?,
        of_legacy(spec("Tiki wiki").load_name("tiki"))?,
        of_legacy(spec("TOML").extensions(["toml"]))?,
        of_legacy(spec("Troff").extensions(["1", "2", "3", "4", "5", "6", "7", "8", "9"]))?,
        of_legacy(spec("TTCN").extensions(["ttcn", "ttcn3", "ttcnpp"]))?,
        of_legacy(spec("TTCN_CFG")
            .extensions(["cfg"])
            .loader(mode("ttcn-cfg", "ttcnCfg")))?,
        of_legacy(spec("Turtle").extensions(["ttl"]))?,
        of_legacy(spec("Web IDL").extensions(["webidl"]).load_name("webIDL"))?,
        of_legacy(spec("VB.NET").extensions(["vb"]).load_name("vb"))?,
        of_legacy(spec("VBScript").extensions(["vbs"]).load_name("vbScript"))?,
        of_legacy(spec("Velocity").extensions(["vtl"]))?,
        of_legacy(spec("Verilog").extensions(["v"]))?,
        of_legacy(spec("VHDL").extensions(["vhd", "vhdl"]))?,
        of_legacy(spec("XQuery").extensions(["xy", "xquery"]).load_name("xQuery"))?,
        of_legacy(spec("Yacas").extensions(["ys"]))?,
        of_legacy(spec("Z80").extensions(["z80"]))?,
        of_legacy(spec("MscGen").extensions(["mscgen", "mscin", "msc"]))?,
        of_legacy(spec("Xù")
            .extensions(["xu"])
            .loader(mode("mscgen", "xu")))?,
        of_legacy(spec("MsGenny")
            .extensions(["msgenny"])
            .loader(mode("mscgen", "msgenny")))?,
        // Grammar-backed, added after the legacy modes
        of(spec("Vue").extensions(["vue"]))?,
        of(spec("Angular Template")
            .module("tree-sitter-angular")
            .load_name("angular"))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(languages: &'a [LanguageDescription], name: &str) -> &'a LanguageDescription {
        languages
            .iter()
            .find(|lang| lang.name() == name)
            .unwrap_or_else(|| panic!("{name} missing from table"))
    }

    #[test]
    fn test_table_shape() {
        let languages = languages().unwrap();
        assert_eq!(languages.len(), 143);
        assert_eq!(languages.iter().filter(|lang| lang.is_legacy()).count(), 111);
        assert_eq!(languages.first().unwrap().name(), "C");
        assert_eq!(languages.last().unwrap().name(), "Angular Template");
    }

    #[test]
    fn test_inferred_loaders() {
        let languages = languages().unwrap();

        let css = find(&languages, "CSS");
        assert_eq!(css.loader().module(), Some("tree-sitter-css"));
        assert_eq!(css.loader().export(), Some("css"));

        let web_idl = find(&languages, "Web IDL");
        assert_eq!(web_idl.loader().module(), Some("legacy-modes/mode/webidl"));
        assert_eq!(web_idl.loader().export(), Some("webIDL"));

        let asn = find(&languages, "ASN.1");
        assert_eq!(asn.loader().module(), Some("legacy-modes/mode/asn1"));

        let angular = find(&languages, "Angular Template");
        assert_eq!(angular.module(), "tree-sitter-angular");
        assert_eq!(angular.loader().export(), Some("angular"));
        assert!(!angular.is_legacy());
    }

    #[test]
    fn test_explicit_loaders() {
        let languages = languages().unwrap();

        let postgres = find(&languages, "PostgreSQL");
        assert_eq!(postgres.module(), "tree-sitter-sql");
        match postgres.loader() {
            Loader::Factory { options, .. } => {
                assert_eq!(options.get("dialect"), Some(&serde_json::json!("PostgreSQL")));
            }
            other => panic!("expected factory, got {:?}", other),
        }

        let tsx = find(&languages, "TSX");
        match tsx.loader() {
            Loader::Factory { options, .. } => {
                assert_eq!(options.get("jsx"), Some(&serde_json::json!(true)));
                assert_eq!(options.get("typescript"), Some(&serde_json::json!(true)));
            }
            other => panic!("expected factory, got {:?}", other),
        }

        let xu = find(&languages, "Xù");
        assert_eq!(xu.module(), "legacy-modes");
        assert_eq!(xu.loader().module(), Some("legacy-modes/mode/mscgen"));
        assert_eq!(xu.loader().export(), Some("xu"));
    }
}
