//! The document printed by `printflow --example`: a short catalogue of
//! commedia dell'arte stock characters.

use serde_json::{json, Value};

pub fn catalogue() -> Value {
    json!({
        "title": "Commedia dell'arte",
        "data": {
            "types": [
                {
                    "name": "Innamorati",
                    "description": "The Innamorati are the romantic leads. 'Lovers' would be an accurate translation for their title. In traditional commedia, the romance of the innamorati is the driving plot of the show and the event that sends the other characters into action."
                },
                {
                    "name": "Zanni",
                    "description": "The Zanni are often referred to as 'servant' characters, but almost all zanni have traditional uses for filling out other careers ranging from shopkeepers to politicians."
                },
                {
                    "name": "Vecchi",
                    "description": "The word vecchi literally means 'old men'. They are usually the authority figures in the story, with the parts most typically fulfilled by the Doctor and Pantalone."
                }
            ],
            "characters": [
                {
                    "name": "Brighella; or Brigella, Brighelle.",
                    "description": "An ill-tempered but intelligent zanni. Unlike the other zanni who are often gullible, Brighella is cunning and can manipulate circumstances in ways that would be beyond the other characters. His name comes from an old Italian word that means 'brawl'.",
                    "trait": "Malicious intelligence, manifesting as insults, trouble-making, schemes, and brawls."
                },
                {
                    "name": "Captain; or Capitano.",
                    "description": "The Captain can fall into both the zanni and the vecchi categories. He is opportunistic and greedy, and in many scenari he is revealed to have never been a captain at all. He is usually played as an extreme coward behind his bravado.",
                    "trait": "Egotism and megalomania."
                },
                {
                    "name": "Cola; or Colafronio.",
                    "description": "Usually a zanni, but sometimes classed as a vecchio and occasionally even an inamorato; he is depicted as well-dressed and wearing glasses.",
                    "trait": ""
                },
                {
                    "name": "Coviello; or Covielle.",
                    "description": "His name is a double-diminutive of the name Giacomo. Callot's illustrations show his mask to possess an extremely long nose, and he usually wears a plumed hat.",
                    "trait": "Bluntness."
                },
                {
                    "name": "Doctor.",
                    "description": "The Doctor is one of the vecchi. He has an unusual mask that covers only the nose and forehead, and dresses in black. He is rarely shown as being even remotely competent in his profession.",
                    "trait": "Egotism and pride; often conflicting with his actual stupidity and ineptitude."
                },
                {
                    "name": "Harlequin; or Arlequin or Arlecchino.",
                    "description": "The most famous of the zanni. Acrobatic and quick, he is forever hungry and forever in trouble, and his patched costume became the diamond pattern everyone recognises.",
                    "trait": "Making a nuisance of himself."
                },
                {
                    "name": "Pantalone; or Pantaloon.",
                    "description": "A Venetian merchant and the best known of the vecchi. Rich, old and miserly, he is forever chasing young women and losing his money.",
                    "trait": "Greed and stinginess."
                },
                {
                    "name": "Tartaglia.",
                    "description": "A Neapolitan vecchio with thick glasses and a heavy stutter, often cast as a lawyer or a notary.",
                    "trait": "Stutter."
                }
            ]
        },
        "blocks": [
            {
                "type": "Paragraph",
                "content": "Types",
                "style": { "fontSize": 16, "bold": true, "spaceAfter": 6 }
            },
            {
                "type": "List",
                "items": { "$ref": "types" },
                "as": "type",
                "template": [
                    { "content": { "$upper": { "$ref": "type.name" } }, "style": { "bold": true } },
                    { "content": { "$ref": "type.description" }, "style": { "spaceAfter": 8 } }
                ]
            },
            {
                "type": "Paragraph",
                "content": "Characters",
                "style": { "fontSize": 16, "bold": true, "spaceAfter": 6 }
            },
            {
                "type": "List",
                "items": { "$ref": "characters" },
                "as": "character",
                "template": [
                    { "content": { "$ref": "character.name" }, "style": { "fontSize": 13, "bold": true } },
                    { "content": { "$ref": "character.description" } },
                    {
                        "$if": { "$ref": "character.trait" },
                        "then": {
                            "content": { "$concat": ["Primary comic trait: ", { "$ref": "character.trait" }] },
                            "style": { "spaceAfter": 10 }
                        }
                    }
                ]
            }
        ]
    })
}
