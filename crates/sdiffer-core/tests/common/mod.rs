use std::collections::HashMap;

use sdiffer_core::diffable_struct;

#[allow(dead_code)]
#[derive(Debug)]
pub struct Person {
    pub name: String,
    pub age: i64,
    pub loc: Option<Box<Location>>,
    pub str_arr: Vec<String>,
    pub parents: Vec<Person>,
}

diffable_struct!(Person {
    name as "Name",
    age as "Age",
    loc as "Loc",
    str_arr as "StrArr",
    parents as "Parents",
});

#[allow(dead_code)]
#[derive(Debug)]
pub struct Location {
    pub name: String,
    pub province: Option<Box<Location>>,
}

diffable_struct!(Location { name as "Name", province as "Province" });

#[allow(dead_code)]
pub struct Building {
    pub building_map: HashMap<String, String>,
}

diffable_struct!(Building { building_map as "BuildingMap" });

/// Person with only a name and age set
#[allow(dead_code)]
pub fn person(name: &str, age: i64) -> Person {
    Person {
        name: name.to_string(),
        age,
        loc: None,
        str_arr: Vec::new(),
        parents: Vec::new(),
    }
}

#[allow(dead_code)]
pub fn location(name: &str, province: Option<Location>) -> Location {
    Location {
        name: name.to_string(),
        province: province.map(Box::new),
    }
}

/// Chain of `levels` nested provinces
#[allow(dead_code)]
pub fn location_chain(levels: usize) -> Location {
    let mut loc = location("leaf", None);
    for i in 0..levels {
        loc = location(&format!("level {}", i), Some(loc));
    }
    loc
}

#[allow(dead_code)]
pub fn building(entries: &[(&str, &str)]) -> Building {
    Building {
        building_map: entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// The pair from the classic scenario: five top-level differences plus
/// one in each generation of parents
#[allow(dead_code)]
pub fn me_and_he() -> (Person, Person) {
    let mut me = person("sjl", 20);
    me.loc = Some(Box::new(location(
        "Ji'An",
        Some(location("JiangXi", None)),
    )));
    me.str_arr = vec!["hello".into(), "world".into(), "hi".into()];
    let mut me_father = person("me father", 0);
    me_father.parents.push(person("me grandFather", 0));
    me.parents.push(me_father);

    let mut he = person("kxc", 21);
    he.str_arr = vec!["world".into(), "hello".into(), "hi".into()];
    let mut he_father = person("he father", 0);
    he_father.parents.push(person("he grandFather", 0));
    he.parents.push(he_father);

    (me, he)
}

/// Parents listed in different orders, one with a different age
#[allow(dead_code)]
pub fn disordered_parents() -> (Person, Person) {
    let mut me = person("me", 20);
    me.parents = vec![person("p1", 30), person("p2", 40), person("p3", 45)];

    let mut he = person("he", 21);
    he.parents = vec![person("p2", 40), person("p1", 30), person("p3", 50)];

    (me, he)
}
